//! End-to-end coordination: registries shared between a command surface
//! and the hub, broadcast fan-out, and fleet readiness.

#![allow(clippy::unwrap_used)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use {anyhow::Result, async_trait::async_trait};

use {
    botswarm_config::BotswarmConfig,
    botswarm_fleet::{ExecutorHandle, RoutineKind},
    botswarm_hub::Hub,
    botswarm_notify::{
        Attachment, EmbedSpec, NotifyRegistry, RegisterOutcome, ResultEvent, RichSink, TextSink,
    },
};

#[derive(Default)]
struct CaptureSink {
    texts: Mutex<Vec<String>>,
    /// (embed title, carried a file)
    embeds: Mutex<Vec<(String, bool)>>,
}

#[async_trait]
impl TextSink for CaptureSink {
    async fn send_text(&self, text: &str) -> Result<()> {
        self.texts.lock().unwrap().push(text.into());
        Ok(())
    }
}

#[async_trait]
impl RichSink for CaptureSink {
    async fn send_rich(&self, file: Option<&Attachment>, embed: &EmbedSpec) -> Result<()> {
        self.embeds
            .lock()
            .unwrap()
            .push((embed.title.clone(), file.is_some()));
        Ok(())
    }
}

fn register(registry: &NotifyRegistry, id: &str, sink: &Arc<CaptureSink>) {
    let outcome = registry.register(
        id,
        format!("#{id}"),
        Arc::clone(sink) as Arc<dyn TextSink>,
        Arc::clone(sink) as Arc<dyn RichSink>,
    );
    assert_eq!(outcome, RegisterOutcome::Registered);
}

#[tokio::test]
async fn hub_relays_events_to_the_matching_registry() {
    let echo = Arc::new(NotifyRegistry::new());
    let results = Arc::new(NotifyRegistry::new());
    let ops = Arc::new(CaptureSink::default());
    let raids = Arc::new(CaptureSink::default());
    register(&echo, "ops", &ops);
    register(&results, "raids", &raids);

    let hub = Hub::with_registries(
        Arc::new(BotswarmConfig::default()),
        Arc::clone(&echo),
        Arc::clone(&results),
    );

    // Executor lifecycle drives readiness.
    let handle = ExecutorHandle::new("switch-0", "Dock A");
    hub.fleet().add(handle.clone());
    assert!(!hub.raid_ready());
    handle.set_routine(RoutineKind::RotatingRaid);
    assert!(hub.raid_ready());

    // Plain echoes reach the echo registry only.
    let report = hub.echo().echo_joined("executor attached").await;
    assert_eq!(report.delivered, 1);
    assert_eq!(
        ops.texts.lock().unwrap().as_slice(),
        ["executor attached".to_string()]
    );
    assert!(raids.texts.lock().unwrap().is_empty());

    // Result payloads reach the results registry only.
    let event = ResultEvent::with_attachment(
        EmbedSpec {
            title: "Encounter".into(),
            description: "shiny frame 10242".into(),
            ..EmbedSpec::default()
        },
        Attachment {
            file_name: "encounter.bin".into(),
            bytes: vec![1, 2, 3],
        },
    );
    let report = hub.results().announce_result_joined(event).await;
    assert_eq!(report.delivered, 1);
    let embeds = raids.embeds.lock().unwrap();
    assert_eq!(embeds.as_slice(), [("Encounter".to_string(), true)]);
    assert!(ops.embeds.lock().unwrap().is_empty());
}

#[tokio::test]
async fn announce_reaches_echo_channels_without_blocking_the_caller() {
    let echo = Arc::new(NotifyRegistry::new());
    let ops = Arc::new(CaptureSink::default());
    register(&echo, "ops", &ops);

    let hub = Hub::with_registries(
        Arc::new(BotswarmConfig::default()),
        Arc::clone(&echo),
        Arc::new(NotifyRegistry::new()),
    );

    hub.announce("maintenance at midnight");

    // Fire-and-forget: poll until the detached delivery task lands.
    for _ in 0..100 {
        if !ops.embeds.lock().unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let embeds = ops.embeds.lock().unwrap();
    assert_eq!(embeds.len(), 1);
    assert_eq!(embeds[0].0, "Important Announcement!");
    assert!(!embeds[0].1);
}
