//! Shared test utilities used across hrgnet crates.

pub mod tracing {
    //! Recording layer for asserting on spans and events in tests.
    use std::collections::HashMap;
    use std::fmt;
    use std::sync::{Arc, Mutex, PoisonError};

    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;

    /// Layer that keeps every closed span and every emitted event so tests
    /// can inspect the structured fields afterwards.
    #[derive(Clone, Default)]
    pub struct RecordingLayer {
        spans: Arc<Mutex<Vec<SpanRecord>>>,
        events: Arc<Mutex<Vec<EventRecord>>>,
    }

    impl RecordingLayer {
        /// Runs `operation` with a fresh recording subscriber installed as the
        /// thread default and returns its output together with the layer.
        ///
        /// # Examples
        /// ```
        /// use hrgnet_test_support::tracing::RecordingLayer;
        ///
        /// let (value, layer) = RecordingLayer::capture(|| {
        ///     tracing::info_span!("demo.span", answer = 42).in_scope(|| 7)
        /// });
        /// assert_eq!(value, 7);
        /// let span = layer.span("demo.span").expect("span is closed");
        /// assert_eq!(span.field("answer"), Some("42"));
        /// ```
        pub fn capture<T>(operation: impl FnOnce() -> T) -> (T, Self) {
            let layer = Self::default();
            let subscriber = tracing_subscriber::registry().with(layer.clone());
            let output = tracing::subscriber::with_default(subscriber, operation);
            (output, layer)
        }

        /// Snapshot of the closed spans in completion order.
        ///
        /// # Examples
        /// ```
        /// use hrgnet_test_support::tracing::RecordingLayer;
        ///
        /// let layer = RecordingLayer::default();
        /// assert!(layer.spans().is_empty());
        /// ```
        #[must_use]
        pub fn spans(&self) -> Vec<SpanRecord> {
            self.spans
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Snapshot of the emitted events in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<EventRecord> {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// First closed span called `name`, if any.
        #[must_use]
        pub fn span(&self, name: &str) -> Option<SpanRecord> {
            self.spans().into_iter().find(|span| span.name == name)
        }

        /// Events whose `message` field equals `message`.
        #[must_use]
        pub fn events_with_message(&self, message: &str) -> Vec<EventRecord> {
            self.events()
                .into_iter()
                .filter(|event| event.message() == Some(message))
                .collect()
        }
    }

    /// A closed span with its name and the final value of each field.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SpanRecord {
        /// Span name from the callsite metadata.
        pub name: String,
        /// Fields recorded at creation or later through `Span::record`.
        pub fields: HashMap<String, String>,
    }

    impl SpanRecord {
        /// Rendered value of `name`, if the span recorded it.
        #[must_use]
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields.get(name).map(String::as_str)
        }
    }

    /// An emitted event with its level, target and fields.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct EventRecord {
        /// Event level.
        pub level: Level,
        /// Module path or explicit target of the event.
        pub target: String,
        /// Structured fields, including `message` for formatted events.
        pub fields: HashMap<String, String>,
    }

    impl EventRecord {
        /// Rendered value of `name`, if the event carried it.
        #[must_use]
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields.get(name).map(String::as_str)
        }

        /// The formatted message of the event.
        #[must_use]
        pub fn message(&self) -> Option<&str> {
            self.field("message")
        }
    }

    #[derive(Default)]
    struct SpanData {
        name: String,
        fields: HashMap<String, String>,
    }

    impl<S> Layer<S> for RecordingLayer
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            id: &tracing::span::Id,
            ctx: Context<'_, S>,
        ) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut data = SpanData {
                name: attrs.metadata().name().to_owned(),
                fields: HashMap::new(),
            };
            attrs.record(&mut FieldRecorder {
                fields: &mut data.fields,
            });
            span.extensions_mut().insert(data);
        }

        fn on_record(
            &self,
            id: &tracing::span::Id,
            values: &tracing::span::Record<'_>,
            ctx: Context<'_, S>,
        ) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut extensions = span.extensions_mut();
            if let Some(data) = extensions.get_mut::<SpanData>() {
                values.record(&mut FieldRecorder {
                    fields: &mut data.fields,
                });
            }
        }

        fn on_close(&self, id: tracing::span::Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(&id) else {
                return;
            };
            let Some(data) = span.extensions_mut().remove::<SpanData>() else {
                return;
            };
            self.spans
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(SpanRecord {
                    name: data.name,
                    fields: data.fields,
                });
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = HashMap::new();
            event.record(&mut FieldRecorder {
                fields: &mut fields,
            });
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(EventRecord {
                    level: *event.metadata().level(),
                    target: event.metadata().target().to_owned(),
                    fields,
                });
        }
    }

    struct FieldRecorder<'a> {
        fields: &'a mut HashMap<String, String>,
    }

    impl FieldRecorder<'_> {
        fn insert(&mut self, field: &Field, value: String) {
            self.fields.insert(field.name().to_owned(), value);
        }
    }

    impl Visit for FieldRecorder<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.insert(field, format!("{value:?}"));
        }

        fn record_str(&mut self, field: &Field, value: &str) {
            self.insert(field, value.to_owned());
        }

        fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
            self.insert(field, value.to_string());
        }

        fn record_bool(&mut self, field: &Field, value: bool) {
            self.insert(field, value.to_string());
        }

        fn record_i64(&mut self, field: &Field, value: i64) {
            self.insert(field, value.to_string());
        }

        fn record_u64(&mut self, field: &Field, value: u64) {
            self.insert(field, value.to_string());
        }

        fn record_f64(&mut self, field: &Field, value: f64) {
            self.insert(field, value.to_string());
        }
    }

}
