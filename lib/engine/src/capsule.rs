//! Capsules: typed processing units wrapping external services.
//!
//! A capsule is "a thing with declared ports and one async processing
//! function". The engine treats capsules as opaque beyond that: it never
//! keeps a registry of known capsule kinds, and new capsules are added by
//! implementing the `Capsule` trait, never by extending the engine.

use crate::error::CapsuleError;
use crate::port::Port;
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Values flowing through a run, keyed by port id.
pub type ValueMap = HashMap<String, JsonValue>;

/// The single polymorphic interface all capsules satisfy.
///
/// `execute` receives the resolved inputs and the node's static config as
/// two separate maps; config never shadows a connection-supplied input
/// because the two travel in different argument positions.
#[async_trait]
pub trait Capsule: Send + Sync {
    /// Identifier for this capsule kind (e.g. "stripe-charge").
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Catalog category (e.g. "payment", "email"). Informational only.
    fn category(&self) -> &str;

    /// Semantic version of this capsule definition.
    fn version(&self) -> &str {
        "0.1.0"
    }

    /// Declared input ports.
    fn inputs(&self) -> &[Port];

    /// Declared output ports.
    fn outputs(&self) -> &[Port];

    /// Whether this capsule has a processing function.
    ///
    /// A capsule without one is treated as a no-op by the executor: it is
    /// skipped with a warning and records an empty output map.
    fn is_executable(&self) -> bool {
        true
    }

    /// Runs the capsule's processing function.
    ///
    /// # Errors
    ///
    /// Returns a `CapsuleError` when processing fails; the executor
    /// recovers it and records it against the node.
    async fn execute(&self, inputs: ValueMap, config: &JsonValue)
    -> Result<ValueMap, CapsuleError>;

    /// Returns the input port with the given id, if any.
    fn input_port(&self, id: &str) -> Option<&Port> {
        self.inputs().iter().find(|p| p.id == id)
    }

    /// Returns the output port with the given id, if any.
    fn output_port(&self, id: &str) -> Option<&Port> {
        self.outputs().iter().find(|p| p.id == id)
    }
}

/// Boxed async processing function for descriptor-backed capsules.
type ProcessFn = Box<
    dyn Fn(ValueMap, JsonValue) -> BoxFuture<'static, Result<ValueMap, CapsuleError>>
        + Send
        + Sync,
>;

/// A capsule assembled from data: declared ports plus an optional boxed
/// processing closure.
///
/// This is the shape capsule authors hand to the engine. The processing
/// function is optional; a descriptor without one acts as a no-op node
/// (useful for annotation/placeholder nodes in the editor).
pub struct CapsuleDescriptor {
    id: String,
    name: String,
    category: String,
    version: String,
    inputs: Vec<Port>,
    outputs: Vec<Port>,
    process: Option<ProcessFn>,
}

impl CapsuleDescriptor {
    /// Creates a new descriptor with no ports and no processing function.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: "general".to_string(),
            version: "0.1.0".to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            process: None,
        }
    }

    /// Sets the catalog category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Adds an input port.
    #[must_use]
    pub fn with_input(mut self, port: Port) -> Self {
        self.inputs.push(port);
        self
    }

    /// Adds an output port.
    #[must_use]
    pub fn with_output(mut self, port: Port) -> Self {
        self.outputs.push(port);
        self
    }

    /// Sets the async processing function.
    #[must_use]
    pub fn with_process<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(ValueMap, JsonValue) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ValueMap, CapsuleError>> + Send + 'static,
    {
        self.process = Some(Box::new(move |inputs, config| Box::pin(f(inputs, config))));
        self
    }
}

impl std::fmt::Debug for CapsuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapsuleDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("category", &self.category)
            .field("version", &self.version)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("executable", &self.process.is_some())
            .finish()
    }
}

#[async_trait]
impl Capsule for CapsuleDescriptor {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn inputs(&self) -> &[Port] {
        &self.inputs
    }

    fn outputs(&self) -> &[Port] {
        &self.outputs
    }

    fn is_executable(&self) -> bool {
        self.process.is_some()
    }

    async fn execute(
        &self,
        inputs: ValueMap,
        config: &JsonValue,
    ) -> Result<ValueMap, CapsuleError> {
        match &self.process {
            Some(process) => process(inputs, config.clone()).await,
            None => Ok(ValueMap::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortType;
    use serde_json::json;

    fn echo_capsule() -> CapsuleDescriptor {
        CapsuleDescriptor::new("echo", "Echo")
            .with_input(Port::required("value", "Value", PortType::Any))
            .with_output(Port::output("value", "Value", PortType::Any))
            .with_process(|inputs, _config| async move { Ok(inputs) })
    }

    #[test]
    fn descriptor_declares_ports() {
        let capsule = echo_capsule();
        assert_eq!(capsule.inputs().len(), 1);
        assert_eq!(capsule.outputs().len(), 1);
        assert!(capsule.input_port("value").is_some());
        assert!(capsule.input_port("missing").is_none());
        assert!(capsule.output_port("value").is_some());
    }

    #[test]
    fn descriptor_without_process_is_not_executable() {
        let capsule = CapsuleDescriptor::new("note", "Sticky Note").with_category("editor");
        assert!(!capsule.is_executable());
        assert_eq!(capsule.category(), "editor");
    }

    #[tokio::test]
    async fn descriptor_executes_process() {
        let capsule = echo_capsule();
        let mut inputs = ValueMap::new();
        inputs.insert("value".to_string(), json!(42));

        let outputs = capsule
            .execute(inputs, &JsonValue::Null)
            .await
            .expect("execute");
        assert_eq!(outputs.get("value"), Some(&json!(42)));
    }

    #[tokio::test]
    async fn descriptor_without_process_returns_empty_outputs() {
        let capsule = CapsuleDescriptor::new("note", "Sticky Note");
        let outputs = capsule
            .execute(ValueMap::new(), &JsonValue::Null)
            .await
            .expect("execute");
        assert!(outputs.is_empty());
    }

    #[tokio::test]
    async fn descriptor_receives_config() {
        let capsule = CapsuleDescriptor::new("greet", "Greeter")
            .with_output(Port::output("greeting", "Greeting", PortType::String))
            .with_process(|_inputs, config| async move {
                let name = config
                    .get("name")
                    .and_then(JsonValue::as_str)
                    .unwrap_or("world");
                let mut outputs = ValueMap::new();
                outputs.insert("greeting".to_string(), json!(format!("hello {name}")));
                Ok(outputs)
            });

        let outputs = capsule
            .execute(ValueMap::new(), &json!({"name": "ada"}))
            .await
            .expect("execute");
        assert_eq!(outputs.get("greeting"), Some(&json!("hello ada")));
    }

    #[tokio::test]
    async fn descriptor_propagates_failure() {
        let capsule = CapsuleDescriptor::new("bomb", "Bomb")
            .with_process(|_inputs, _config| async move { Err(CapsuleError::failed("boom")) });

        let result = capsule.execute(ValueMap::new(), &JsonValue::Null).await;
        assert_eq!(result, Err(CapsuleError::failed("boom")));
    }
}
