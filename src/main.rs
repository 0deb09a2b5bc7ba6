use std::sync::Arc;

use tokio::sync::watch;

use payrota::adapters::{
    FileStateStore, TelegramClient, TelegramClientConfig, TelegramNotifier, UpdatePoller,
    UpdatePollerConfig,
};
use payrota::application::handlers::{
    AdvanceCycleHandler, DeliveryTargets, GetDueDateHandler, GetStatusHandler, ListRosterHandler,
    MarkPaidHandler, OverrideCycleHandler, ResendReminderHandler, SharedRotation,
};
use payrota::application::{
    CommandHandlers, CommandSurface, MonthlySchedule, MonthlyScheduler, ReminderTemplate,
};
use payrota::config::{AppConfig, ValidationError};
use payrota::domain::foundation::{ChatId, UserId};
use payrota::ports::{Notifier, StateStore};
use secrecy::ExposeSecret;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    payrota::telemetry::init(&config.logging);
    config.validate()?;
    for warning in config.warnings() {
        tracing::warn!("{}", warning);
    }

    let roster = Arc::new(config.rotation.roster()?);
    let offset = config
        .schedule
        .offset()
        .ok_or(ValidationError::InvalidUtcOffset(config.schedule.utc_offset_minutes))?;
    let schedule = MonthlySchedule::new(
        config.schedule.day_of_month,
        config.schedule.hour,
        config.schedule.minute,
        offset,
    )?;

    let store: Arc<dyn StateStore> = Arc::new(FileStateStore::new(
        &config.rotation.state_file,
        roster.clone(),
    ));
    let rotation = SharedRotation::load(roster.clone(), store).await;

    let client = Arc::new(TelegramClient::new(
        TelegramClientConfig::new(config.telegram.bot_token.expose_secret().clone())
            .with_base_url(config.telegram.api_base_url.clone())
            .with_timeout(config.telegram.timeout()),
    )?);
    let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(client.clone()));

    let admin = config.telegram.admin_user_id.map(UserId::new);
    let targets = DeliveryTargets {
        group: config.telegram.group_id.map(ChatId::new),
        admin: admin.map(|a| a.private_chat()),
    };
    let template = Arc::new(ReminderTemplate {
        service_name: config.rotation.service_name.clone(),
        amount: config.rotation.amount.clone(),
        payment_key: config.rotation.payment_key.clone(),
        admin_handle: config.rotation.admin_handle.clone(),
    });

    let advance = Arc::new(AdvanceCycleHandler::new(
        rotation.clone(),
        notifier.clone(),
        targets,
        template.clone(),
    ));
    let surface = Arc::new(CommandSurface::new(
        roster.clone(),
        admin,
        offset,
        CommandHandlers {
            mark_paid: MarkPaidHandler::new(rotation.clone(), notifier.clone(), targets),
            override_cycle: OverrideCycleHandler::new(rotation.clone()),
            resend_reminder: ResendReminderHandler::new(
                rotation.clone(),
                notifier.clone(),
                targets,
                template,
            ),
            get_status: GetStatusHandler::new(rotation.clone()),
            get_due_date: GetDueDateHandler::new(rotation.clone()),
            list_roster: ListRosterHandler::new(roster.clone()),
        },
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler = MonthlyScheduler::new(schedule, advance);
    let scheduler_task = tokio::spawn({
        let shutdown = shutdown_rx.clone();
        async move { scheduler.run(shutdown).await }
    });

    let poller = UpdatePoller::new(
        client,
        surface,
        UpdatePollerConfig {
            poll_timeout: config.telegram.poll_timeout(),
            ..Default::default()
        },
    );
    let poller_task = tokio::spawn(async move { poller.run(shutdown_rx).await });

    tracing::info!(
        participants = roster.len(),
        state_file = %config.rotation.state_file.display(),
        "Payrota started"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");
    let _ = shutdown_tx.send(true);

    let (scheduler_result, poller_result) = tokio::join!(scheduler_task, poller_task);
    if let Err(e) = scheduler_result {
        tracing::error!("Scheduler task failed: {}", e);
    }
    if let Err(e) = poller_result {
        tracing::error!("Update poller task failed: {}", e);
    }

    Ok(())
}
