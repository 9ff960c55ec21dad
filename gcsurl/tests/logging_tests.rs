mod common;

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use common::*;
use gcsurl::{Config, UrlGenerator};
use tracing::{field::Field, Event, Level, Subscriber};
use tracing_subscriber::{
    field::Visit,
    layer::{Context, SubscriberExt},
    Layer, Registry,
};

#[derive(Clone, Default)]
struct CapturedEvents(Arc<Mutex<Vec<(Level, String)>>>);

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for CapturedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.0
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}

impl CapturedEvents {
    fn at_level(&self, level: Level) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(event_level, _)| *event_level == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

#[test]
fn test_startup_logs_one_info_line() {
    let events = CapturedEvents::default();
    let subscriber = Registry::default().with(events.clone());

    tracing::subscriber::with_default(subscriber, || {
        let env = env_map(&[("GCS_BUCKET_NAME", TEST_BUCKET)]);
        UrlGenerator::from_sources(&Config::default(), None, &env).unwrap();
    });

    assert_eq!(
        events.at_level(Level::INFO),
        vec!["resolved generator configuration".to_string()]
    );
    assert!(events
        .at_level(Level::DEBUG)
        .contains(&"URL generator ready".to_string()));
}
