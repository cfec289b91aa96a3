use clap::Parser;
use lab_sample_engine::{app, config, i18n};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 서브커맨드를 실행한다.
fn main() {
    let cli = app::Cli::parse();
    if let Err(err) = try_run(cli) {
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

fn try_run(cli: app::Cli) -> Result<(), app::AppError> {
    let cfg = config::load_or_default()?;
    init_tracing(cfg.log_json);
    let lang = i18n::resolve_language(&cli.lang, Some(&cfg.language));
    let tr = i18n::Translator::new_with_pack(&lang, cli.locales.as_deref());
    tracing::debug!(lang = tr.language_code(), "translator ready");
    app::run(cli, &cfg, &tr)
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
