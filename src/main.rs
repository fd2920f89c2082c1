use clap::Parser;
use logomock::{
    codec, logger, AspectRatio, Config, GeminiClient, ImageBuffer, IndustryCategory, InputMode,
    OutputCount, Session,
};
use std::path::{Path, PathBuf};

/// Composite a logo into AI-generated photographic mockups.
#[derive(Parser, Debug)]
#[command(name = "logomock", version, about)]
struct Args {
    /// Logo image file (PNG or JPEG)
    #[arg(short, long)]
    logo: PathBuf,

    /// Scene to photograph. Ignored when --base is given.
    #[arg(short, long, default_value = "")]
    description: String,

    /// Photo whose existing logo should be replaced
    #[arg(short, long)]
    base: Option<PathBuf>,

    /// Industry category label, e.g. "Tech & SaaS"
    #[arg(short, long, default_value = "Restaurant & Cafe")]
    category: String,

    /// Output aspect ratio as W:H
    #[arg(short, long, default_value = "1920:1080")]
    aspect: String,

    /// Number of images to generate (1, 2 or 4)
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Clean up the description with the text model before generating
    #[arg(long)]
    rewrite: bool,

    /// Directory to write results into
    #[arg(short, long, default_value = "mockups")]
    out: PathBuf,

    #[arg(short, long)]
    verbose: bool,

    /// Emit log lines as JSON
    #[arg(long)]
    json_logs: bool,

    /// Also append log lines to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

async fn read_image(path: &Path) -> Result<ImageBuffer, Box<dyn std::error::Error>> {
    let bytes = tokio::fs::read(path).await?;
    Ok(codec::from_file_bytes(bytes)?)
}

fn extension_for(image: &ImageBuffer) -> &'static str {
    match image.media_type() {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let dotenv_loaded = dotenv::dotenv().is_ok();

    let base = if args.json_logs {
        logger::LoggerConfig::production()
    } else if args.verbose {
        logger::LoggerConfig::development()
    } else {
        logger::LoggerConfig::new()
    };
    let mut log_config = base.with_env_overrides();
    if args.verbose {
        log_config = log_config.with_level(logger::LogLevel::Debug);
    }
    if let Some(path) = &args.log_file {
        log_config = log_config.with_file(path);
    }
    logger::init_with_config(log_config)?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    logger::log_startup_info("logomock", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    logger::log_config_info(&config);

    let client = match GeminiClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ {}", e.user_message());
            return Err(e.into());
        }
    };

    let mut session = Session::new(*client.upload_limits());

    let category = IndustryCategory::from_label(&args.category).ok_or_else(|| {
        format!(
            "Unknown category '{}'. Choose one of: {}",
            args.category,
            IndustryCategory::all()
                .iter()
                .map(|c| c.label())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;
    session.set_category(category);
    session.draft.aspect_ratio = args.aspect.parse::<AspectRatio>()?;
    session.draft.output_count = OutputCount::try_from(args.count)?;
    session.draft.logo = Some(read_image(&args.logo).await?);

    match &args.base {
        Some(base) => {
            session.draft.input_mode = InputMode::Image;
            session.draft.base_image = Some(read_image(base).await?);
        }
        None => {
            session.draft.input_mode = InputMode::Description;
            session.draft.description = args.description.clone();
            if session.draft.description.trim().is_empty() {
                log::info!("💡 No description given. Some ideas for {}:", category);
                for example in session.examples() {
                    log::info!("  - {}", example);
                }
                return Err("A description or a base image is required".into());
            }
            if args.rewrite {
                session.rewrite_description(client.text()).await?;
                log::info!("📝 Rewritten description: {}", session.draft.description);
            }
        }
    }

    log::info!(
        "🔄 Generating {} mockup(s) at {}...",
        session.draft.output_count.get(),
        session.draft.aspect_ratio
    );

    if let Err(e) = session.submit(client.image()).await {
        log::error!("❌ {}", e.user_message());
        return Err(e.into());
    }

    let Some(set) = session.displayed() else {
        return Err("No result set was published".into());
    };

    tokio::fs::create_dir_all(&args.out).await?;
    for (i, image) in set.images().iter().enumerate() {
        let path = args
            .out
            .join(format!("{}-{}.{}", set.id(), i + 1, extension_for(image)));
        tokio::fs::write(&path, image.bytes()).await?;
        log::info!("💾 Saved {} ({} bytes)", path.display(), image.len());
    }

    log::info!("🎉 Done");
    Ok(())
}
