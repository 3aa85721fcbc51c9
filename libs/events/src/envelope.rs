//! Event envelope - construction, metadata defaults, and re-wrap.

use chrono::{DateTime, Utc};
use relay_id::{ActionId, EventId, ProcessId};
use relay_resource::{validate, FieldKind, Resource, Shape, Stamp};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::error::EventError;
use crate::message::Message;

/// Default for origin fields the caller did not supply.
const UNKNOWN: &str = "Unknown";

/// Required structural shape of an event draft.
const EVENT_SHAPE: Shape = Shape::new(&[("name", FieldKind::Str), ("message", FieldKind::Object)]);

/// Origin and correlation metadata carried by every envelope.
///
/// `correlation_id` and `action_id` are present exactly when they were
/// supplied at construction; everything else falls back to a documented
/// default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMeta {
    origin_engine_id: String,
    origin_engine_name: String,
    origin_process_id: ProcessId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    action_id: Option<ActionId>,
}

impl EventMeta {
    /// Identifier of the engine that produced the envelope.
    #[must_use]
    pub fn origin_engine_id(&self) -> &str {
        &self.origin_engine_id
    }

    /// Name of the engine that produced the envelope.
    #[must_use]
    pub fn origin_engine_name(&self) -> &str {
        &self.origin_engine_name
    }

    /// Process the envelope was produced in.
    #[must_use]
    pub fn origin_process_id(&self) -> ProcessId {
        self.origin_process_id
    }

    /// Identifier linking this envelope to a causally related action, if
    /// one was supplied.
    #[must_use]
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// Identity of the triggering operation, if one was supplied. Stored,
    /// never interpreted here.
    #[must_use]
    pub fn action_id(&self) -> Option<ActionId> {
        self.action_id
    }
}

/// A validated, immutable record of one domain occurrence.
///
/// Built once through [`Event::builder`] (or [`Event::from_value`] for
/// untyped input), read many times, never updated. Identity and creation
/// time come from resource finalization; the payload offers no mutating
/// surface, so a finished envelope can be shared freely across threads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    #[serde(flatten)]
    stamp: Stamp<EventId>,
    name: String,
    message: Message,
    meta: EventMeta,
    origin_user_id: String,
}

impl Event {
    /// Starts building an envelope with the given name.
    pub fn builder(name: impl Into<String>) -> EventBuilder {
        EventBuilder::new(name)
    }

    /// Builds an envelope from untyped input, e.g. attributes handed over
    /// by a bus consumer. Unsupplied metadata takes the same defaults as
    /// the builder.
    ///
    /// # Errors
    ///
    /// [`EventError::UndefinedValue`] when `name` is missing, not a string,
    /// or blank; [`EventError::Structural`] when `message` is present but
    /// not an object.
    pub fn from_value(value: Value) -> Result<Event, EventError> {
        let name = match value.get("name") {
            Some(name) if validate::is_string(name) && !validate::is_empty(name) => {
                name.as_str().unwrap_or_default().to_owned()
            }
            _ => return Err(EventError::undefined_name()),
        };

        let message = match value.get("message") {
            Some(message) => {
                let entries = validate::require_object(Self::KIND, "message", message.clone())?;
                Message::from(entries)
            }
            None => Message::new(),
        };

        Event::builder(name).message(message).build()
    }

    /// Identity assigned at finalization.
    #[must_use]
    pub fn id(&self) -> EventId {
        self.stamp.id
    }

    /// Creation time stamped at finalization.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.stamp.created_at
    }

    /// The event name, e.g. `user.created`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The payload; absent keys resolve to an explicit marker.
    #[must_use]
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Origin and correlation metadata.
    #[must_use]
    pub fn meta(&self) -> &EventMeta {
        &self.meta
    }

    /// Identity of the user on whose behalf the envelope was produced.
    /// Stored, never validated.
    #[must_use]
    pub fn origin_user_id(&self) -> &str {
        &self.origin_user_id
    }

    /// Derives the storage/lookup key for this envelope.
    #[must_use]
    pub fn item_key(&self) -> String {
        Resource::item_key(self)
    }
}

impl Resource for Event {
    const KIND: &'static str = "event";
    type Id = EventId;

    fn id(&self) -> EventId {
        self.stamp.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.stamp.created_at
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wire {
            #[serde(flatten)]
            stamp: Stamp<EventId>,
            name: String,
            message: Message,
            meta: EventMeta,
            origin_user_id: String,
        }

        let wire = Wire::deserialize(deserializer)?;

        // An envelope that deserializes must be one the builder would have
        // built.
        if validate::is_blank(&wire.name) {
            return Err(serde::de::Error::custom("the event name is mandatory"));
        }

        Ok(Event {
            stamp: wire.stamp,
            name: wire.name,
            message: wire.message,
            meta: wire.meta,
            origin_user_id: wire.origin_user_id,
        })
    }
}

/// Builder for one envelope.
///
/// Created through [`Event::builder`]; consumed by [`EventBuilder::build`].
/// Unset options take their documented defaults at build time.
#[derive(Debug)]
pub struct EventBuilder {
    name: String,
    message: Message,
    action_id: Option<ActionId>,
    correlation_id: Option<String>,
    origin_engine_id: Option<String>,
    origin_engine_name: Option<String>,
    origin_process_id: Option<ProcessId>,
    origin_user_id: Option<String>,
}

impl EventBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: Message::new(),
            action_id: None,
            correlation_id: None,
            origin_engine_id: None,
            origin_engine_name: None,
            origin_process_id: None,
            origin_user_id: None,
        }
    }

    /// Sets the payload. Keys never set here resolve to the absent marker
    /// on the built envelope.
    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = message.into();
        self
    }

    /// Records the operation that triggered this envelope.
    pub fn action_id(mut self, id: ActionId) -> Self {
        self.action_id = Some(id);
        self
    }

    /// Links this envelope to a causally related action.
    pub fn correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Identifies the producing engine.
    pub fn origin_engine_id(mut self, id: impl Into<String>) -> Self {
        self.origin_engine_id = Some(id.into());
        self
    }

    /// Names the producing engine.
    pub fn origin_engine_name(mut self, name: impl Into<String>) -> Self {
        self.origin_engine_name = Some(name.into());
        self
    }

    /// Overrides the ambient process identity. Tests inject a fixed value
    /// here to stay deterministic.
    pub fn origin_process_id(mut self, pid: ProcessId) -> Self {
        self.origin_process_id = Some(pid);
        self
    }

    /// Identifies the user on whose behalf the envelope is produced.
    pub fn origin_user_id(mut self, id: impl Into<String>) -> Self {
        self.origin_user_id = Some(id.into());
        self
    }

    /// Validates, finalizes, and freezes the envelope.
    ///
    /// The assembled draft is handed to resource finalization for shape
    /// validation, identity, and the creation timestamp; nothing
    /// partially built escapes on failure.
    ///
    /// # Errors
    ///
    /// [`EventError::UndefinedValue`] when the name is blank;
    /// [`EventError::Structural`] when the draft does not match the
    /// required shape.
    pub fn build(self) -> Result<Event, EventError> {
        if validate::is_blank(&self.name) {
            return Err(EventError::undefined_name());
        }

        let meta = EventMeta {
            origin_engine_id: self.origin_engine_id.unwrap_or_else(|| UNKNOWN.to_owned()),
            origin_engine_name: self
                .origin_engine_name
                .unwrap_or_else(|| UNKNOWN.to_owned()),
            origin_process_id: self.origin_process_id.unwrap_or_else(ProcessId::current),
            correlation_id: self.correlation_id,
            action_id: self.action_id,
        };

        let draft = json!({
            "meta": &meta,
            "name": &self.name,
            "message": &self.message,
        });
        let stamp = relay_resource::finalize::<EventId>(Event::KIND, &EVENT_SHAPE, &draft)?;

        let event = Event {
            stamp,
            name: self.name,
            message: self.message,
            meta,
            origin_user_id: self.origin_user_id.unwrap_or_else(|| UNKNOWN.to_owned()),
        };
        debug!(id = %event.id(), name = event.name(), "event finalized");
        Ok(event)
    }
}

/// Input to the envelope factory: either an envelope that already exists
/// or the parts of a new one.
///
/// Callers holding mixed input resolve it explicitly here instead of
/// relying on argument shape.
#[derive(Debug)]
pub enum EventInput {
    /// A finalized envelope; passes through untouched.
    Existing(Event),

    /// Parts for the normal build path.
    Parts(EventBuilder),
}

impl EventInput {
    /// Resolves the input.
    ///
    /// An existing envelope is returned unchanged - same identity, same
    /// creation time, no re-validation. Parts run the normal build path.
    pub fn into_event(self) -> Result<Event, EventError> {
        match self {
            EventInput::Existing(event) => {
                trace!(id = %event.id(), "re-wrapped finalized event");
                Ok(event)
            }
            EventInput::Parts(builder) => builder.build(),
        }
    }
}

impl From<Event> for EventInput {
    fn from(event: Event) -> Self {
        EventInput::Existing(event)
    }
}

impl From<EventBuilder> for EventInput {
    fn from(builder: EventBuilder) -> Self {
        EventInput::Parts(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use relay_resource::ResourceError;
    use serde_json::json;

    #[test]
    fn test_build_keeps_name_and_message() {
        let event = Event::builder("user.created")
            .message([("user_id", json!("u1"))])
            .build()
            .unwrap();

        assert_eq!(event.name(), "user.created");
        assert_eq!(event.message().get("user_id").as_str(), Some("u1"));
        assert!(event.message().get("email").is_absent());
    }

    #[test]
    fn test_build_defaults() {
        let event = Event::builder("user.created").build().unwrap();

        assert_eq!(event.meta().origin_engine_id(), "Unknown");
        assert_eq!(event.meta().origin_engine_name(), "Unknown");
        assert_eq!(event.meta().origin_process_id(), ProcessId::current());
        assert_eq!(event.origin_user_id(), "Unknown");
        assert!(event.message().is_empty());
        assert_eq!(event.meta().correlation_id(), None);
        assert_eq!(event.meta().action_id(), None);
    }

    #[test]
    fn test_build_stamps_identity_and_time() {
        let before = Utc::now();
        let event = Event::builder("user.created").build().unwrap();

        assert!(event.id().to_string().starts_with("evt-"));
        assert!(event.created_at() >= before);
        assert!(event.created_at() <= Utc::now());
    }

    #[test]
    fn test_correlation_present_iff_supplied() {
        let with = Event::builder("order.shipped")
            .correlation_id("c-42")
            .build()
            .unwrap();
        assert_eq!(with.meta().correlation_id(), Some("c-42"));

        let without = Event::builder("order.shipped").build().unwrap();
        assert_eq!(without.meta().correlation_id(), None);
    }

    #[test]
    fn test_action_id_present_iff_supplied() {
        let action = ActionId::new();
        let with = Event::builder("order.shipped")
            .action_id(action)
            .build()
            .unwrap();
        assert_eq!(with.meta().action_id(), Some(action));

        let without = Event::builder("order.shipped").build().unwrap();
        assert_eq!(without.meta().action_id(), None);
    }

    #[test]
    fn test_injected_process_id() {
        let event = Event::builder("user.created")
            .origin_process_id(ProcessId::new(4242))
            .build()
            .unwrap();
        assert_eq!(event.meta().origin_process_id(), ProcessId::new(4242));
    }

    #[test]
    fn test_blank_names_are_undefined_values() {
        for name in ["", "   ", "\t\n"] {
            let result = Event::builder(name).build();
            assert!(
                matches!(result, Err(EventError::UndefinedValue(_))),
                "name {name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_value_builds_event() {
        let event = Event::from_value(json!({
            "name": "user.created",
            "message": { "user_id": "u1" },
        }))
        .unwrap();

        assert_eq!(event.name(), "user.created");
        assert_eq!(event.message().get("user_id").as_str(), Some("u1"));
    }

    #[test]
    fn test_from_value_defaults_message() {
        let event = Event::from_value(json!({ "name": "user.created" })).unwrap();
        assert!(event.message().is_empty());
    }

    #[test]
    fn test_from_value_rejects_bad_names() {
        for value in [
            json!({}),
            json!({ "name": null }),
            json!({ "name": 42 }),
            json!({ "name": "" }),
        ] {
            let result = Event::from_value(value);
            assert!(matches!(result, Err(EventError::UndefinedValue(_))));
        }
    }

    #[test]
    fn test_from_value_rejects_non_object_message() {
        let result = Event::from_value(json!({
            "name": "user.created",
            "message": "not an object",
        }));

        assert!(matches!(
            result,
            Err(EventError::Structural(ResourceError::Structural {
                field: "message",
                ..
            }))
        ));
    }

    #[test]
    fn test_rewrap_returns_same_event() {
        let event = Event::builder("user.created").build().unwrap();
        let id = event.id();
        let created_at = event.created_at();

        let rewrapped = EventInput::from(event).into_event().unwrap();

        assert_eq!(rewrapped.id(), id);
        assert_eq!(rewrapped.created_at(), created_at);
    }

    #[test]
    fn test_input_parts_run_build_path() {
        let result = EventInput::from(Event::builder("")).into_event();
        assert!(matches!(result, Err(EventError::UndefinedValue(_))));

        let event = EventInput::from(Event::builder("user.created"))
            .into_event()
            .unwrap();
        assert_eq!(event.name(), "user.created");
    }

    #[test]
    fn test_item_key_layout() {
        let event = Event::builder("user.created").build().unwrap();
        assert_eq!(
            event.item_key(),
            format!("event:user.created:{}", event.id())
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let event = Event::builder("order.shipped")
            .message([("order_id", json!("o-7"))])
            .correlation_id("c-42")
            .origin_engine_id("engine-1")
            .origin_engine_name("billing")
            .origin_process_id(ProcessId::new(99))
            .origin_user_id("u-1")
            .build()
            .unwrap();

        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();

        assert_eq!(back, event);
    }

    #[test]
    fn test_serde_omits_unsupplied_correlation() {
        let event = Event::builder("user.created").build().unwrap();
        let json = serde_json::to_value(&event).unwrap();

        assert!(json["meta"].get("correlation_id").is_none());
        assert!(json["meta"].get("action_id").is_none());
    }

    #[test]
    fn test_deserialize_rejects_blank_name() {
        let event = Event::builder("user.created").build().unwrap();
        let mut json = serde_json::to_value(&event).unwrap();
        json["name"] = json!("   ");

        let result: Result<Event, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    proptest! {
        #[test]
        fn prop_nonblank_names_build(name in "[a-z]{1,12}(\\.[a-z]{1,12}){0,3}") {
            let event = Event::builder(name.clone()).build().unwrap();
            prop_assert_eq!(event.name(), name.as_str());
        }

        #[test]
        fn prop_whitespace_names_fail(name in "[ \\t\\n]{0,8}") {
            prop_assert!(Event::builder(name).build().is_err());
        }
    }
}
