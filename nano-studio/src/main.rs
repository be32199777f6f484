//! `nano-studio` command line: accounts, image generation and administration.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]
#![expect(
    clippy::print_stdout,
    reason = "command results are printed as key=value lines on stdout"
)]
#![expect(
    clippy::print_stderr,
    reason = "the CLI reports localized failures on stderr"
)]

use std::env;
use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use nano_studio::StudioSettings;
use nano_studio::domain::{
    Credentials, Dashboard, Error, ErrorMessage, FreeAllowance, GenerationPrompt, ImageId, Locale,
    Studio, StudioOptions, StudioPorts, UserId,
};
use nano_studio::outbound::gemini::GeminiHttpImageGenerator;
use nano_studio::outbound::image_file::{read_image_file, write_image_file};
use nano_studio::outbound::storage::FileKeyValueStore;

type CliStudio = Studio<FileKeyValueStore, GeminiHttpImageGenerator>;

/// `nano-studio` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "nano-studio",
    about = "Generate and edit images with per-account quotas and subscriptions",
    version
)]
struct CliArgs {
    /// Display language for messages (`en` or `ar`). Overrides `NANO_LOCALE`.
    #[arg(long, global = true, value_name = "en|ar")]
    locale: Option<Locale>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Create an account and log in.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Log in as an existing user or the administrator.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// End the current session.
    Logout,
    /// Show the logged-in identity.
    Whoami,
    /// Generate an image from a prompt, or edit `--image` with it.
    Generate {
        #[arg(long)]
        prompt: String,
        #[arg(long, value_name = "path")]
        image: Option<Utf8PathBuf>,
    },
    /// Show account status and image history.
    Dashboard,
    /// Save one of your images to disk.
    Download {
        #[arg(long = "image-id", value_name = "id")]
        image_id: String,
        #[arg(long, value_name = "path")]
        out: Option<Utf8PathBuf>,
    },
    /// List every account (administrator only).
    Users,
    /// Extend a user's subscription by 30 days (administrator only).
    Extend {
        #[arg(long = "user-id", value_name = "id")]
        user_id: String,
    },
    /// Print the WhatsApp link for upgrading to Premium.
    Upgrade,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    init_tracing();

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(args))
}

fn init_tracing() {
    let json = env::var("NANO_LOG_JSON").is_ok_and(|value| value == "1");
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

async fn async_main(args: CliArgs) -> Result<ExitCode> {
    let settings = StudioSettings::load_from_iter([OsString::from("nano-studio")])
        .map_err(|err| eyre!("load configuration: {err}"))?;
    let mut studio = open_studio(&settings)?;
    if let Some(locale) = args.locale {
        studio.set_locale(locale);
    }

    match run(&mut studio, args.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            warn!(code = ?err.code(), "command failed");
            eprintln!("error: {}", err.localized(studio.locale()));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn open_studio(settings: &StudioSettings) -> Result<CliStudio> {
    let data_dir = settings.data_dir().wrap_err("resolve data directory")?;
    let storage = FileKeyValueStore::open(&data_dir)
        .wrap_err_with(|| format!("open data directory {data_dir}"))?;
    let generator = GeminiHttpImageGenerator::new(
        settings.api_base_url().wrap_err("parse api_base_url")?,
        settings.api_key().map(str::to_owned),
        settings.request_timeout(),
    )
    .wrap_err("build HTTP client")?;
    let options = StudioOptions {
        admin_password: settings.admin_password().to_owned(),
        models: settings.models(),
        whatsapp_number: settings.whatsapp_number().to_owned(),
        locale: settings.locale().wrap_err("parse locale")?,
    };
    Studio::open(
        StudioPorts {
            storage: Arc::new(storage),
            generator: Arc::new(generator),
            clock: Arc::new(DefaultClock),
        },
        options,
    )
    .map_err(|err| eyre!("open studio: {err}"))
}

async fn run(studio: &mut CliStudio, command: Command) -> Result<(), Error> {
    match command {
        Command::Register { username, password } => {
            let user = studio.register(&Credentials::new(username, password))?;
            println!("registered={}", user.username());
            println!("user_id={}", user.id());
        }
        Command::Login { username, password } => {
            let identity = studio.login(&Credentials::new(username, password))?;
            println!("logged_in={}", identity.user().username());
            println!("administrator={}", identity.is_administrator());
        }
        Command::Logout => {
            studio.logout()?;
            println!("logged_out=true");
        }
        Command::Whoami => {
            let identity = studio
                .current_identity()
                .ok_or_else(Error::unauthenticated)?;
            println!("username={}", identity.user().username());
            println!("user_id={}", identity.user().id());
            println!("administrator={}", identity.is_administrator());
        }
        Command::Generate { prompt, image } => {
            let request = match image {
                Some(path) => GenerationPrompt::edit(prompt, read_image_file(&path)?),
                None => GenerationPrompt::text(prompt),
            };
            let generated = studio.generate(request).await?;
            println!("image_id={}", generated.id());
            println!("created_at={}", generated.timestamp().to_rfc3339());
            println!("file_name={}", generated.download_file_name());
        }
        Command::Dashboard => print_dashboard(&studio.dashboard()?, studio.locale()),
        Command::Download { image_id, out } => {
            let image = studio.find_image(&ImageId::new(image_id))?;
            let path = out.unwrap_or_else(|| Utf8PathBuf::from(image.download_file_name()));
            write_image_file(&path, &image.inline_image()?)?;
            println!("saved={path}");
        }
        Command::Users => {
            for user in studio.list_users()? {
                println!(
                    "{}\t{}\tpremium={}\timages={}\texpiry={}",
                    user.id(),
                    user.username(),
                    user.is_premium(),
                    user.images_generated(),
                    user.subscription_expiry()
                        .map_or_else(|| "-".to_owned(), |expiry| expiry.to_rfc3339()),
                );
            }
        }
        Command::Extend { user_id } => {
            let id = UserId::new(&user_id)
                .map_err(|err| Error::validation(ErrorMessage::Verbatim(err.to_string())))?;
            let user = studio.extend_subscription(&id)?;
            let expiry = user
                .subscription_expiry()
                .map_or_else(|| "-".to_owned(), |expiry| expiry.to_rfc3339());
            println!("extended={}", user.username());
            println!("expiry={expiry}");
        }
        Command::Upgrade => println!("{}", studio.upgrade_link()?),
    }
    Ok(())
}

fn print_dashboard(dashboard: &Dashboard, locale: Locale) {
    let user = dashboard.identity.user();
    println!("username={}", user.username());
    println!("premium={}", user.is_premium());
    println!("remaining_days={}", dashboard.remaining_days);
    match dashboard.allowance {
        FreeAllowance::Unlimited => println!("free_images_left=unlimited"),
        FreeAllowance::Remaining(left) => println!("free_images_left={left}"),
    }
    println!("images_generated={}", user.images_generated());
    println!("direction={:?}", locale.direction());
    for image in &dashboard.images {
        println!(
            "{}\t{}\t{}",
            image.id(),
            image.timestamp().to_rfc3339(),
            image.prompt()
        );
    }
}
