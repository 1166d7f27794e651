mod config;
mod logging;

use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use config::NotifierConfig;
use notifier_core::OfferExtractor;
use notifier_engine::{
    Dispatcher, EmailDispatcher, FetchSettings, JsonFileStateStore, Pipeline,
    ReqwestCatalogFetcher, RunOutcome, SmtpSettings, WebhookDispatcher,
};
use notifier_logging::{notifier_error, notifier_info};

fn main() -> ExitCode {
    let config = match NotifierConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    logging::initialize(config.log_level, config.log_file.as_deref());
    notifier_logging::set_run_label(Utc::now().format("%Y%m%dT%H%M%SZ").to_string());

    match run(&config) {
        Ok(outcome) => {
            notifier_info!("Run finished: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(err) => {
            notifier_error!("Run failed: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &NotifierConfig) -> anyhow::Result<RunOutcome> {
    let pipeline = build_pipeline(config)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let outcome = runtime.block_on(pipeline.run())?;
    Ok(outcome)
}

fn build_pipeline(config: &NotifierConfig) -> anyhow::Result<Pipeline> {
    let settings = FetchSettings {
        request_timeout: config.fetch_timeout,
        ..FetchSettings::default()
    };

    let mut dispatchers: Vec<Box<dyn Dispatcher>> = Vec::new();
    if let Some(url) = &config.webhook_url {
        let webhook = WebhookDispatcher::new(url.clone(), config.fetch_timeout)
            .context("failed to build webhook client")?;
        dispatchers.push(Box::new(webhook));
    }
    if let Some(email) = &config.email {
        dispatchers.push(Box::new(EmailDispatcher::new(SmtpSettings {
            host: email.smtp_host.clone(),
            port: email.smtp_port,
            username: email.smtp_user.clone(),
            password: email.smtp_password.clone(),
            from: email.from.clone(),
            to: email.recipient.clone(),
            timeout: config.fetch_timeout,
        })));
    }
    notifier_info!(
        "Catalog {} with {} channel(s); state in {:?}",
        config.catalog_endpoint,
        dispatchers.len(),
        config.state_file
    );

    Ok(Pipeline::new(
        Box::new(ReqwestCatalogFetcher::new(
            config.catalog_endpoint.clone(),
            settings,
        )),
        OfferExtractor::new(config.store_base_url.clone()),
        Box::new(JsonFileStateStore::new(config.state_file.clone())),
        dispatchers,
    ))
}
