use serde_json::{json, Value};
use wfdag::config::{ConfigFile, RawConfigFile, TaskOverride};

/// Builder for the JSON form of a workflow, as the loader reads it.
pub struct WorkflowJsonBuilder {
    name: String,
    tasks: Vec<Value>,
}

impl WorkflowJsonBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tasks: Vec::new(),
        }
    }

    pub fn with_task(mut self, task: TaskJsonBuilder) -> Self {
        self.tasks.push(task.build());
        self
    }

    pub fn build(self) -> Value {
        json!({
            "name": self.name,
            "workflow": { "tasks": self.tasks }
        })
    }

    pub fn to_json_string(self) -> String {
        self.build().to_string()
    }
}

/// Builder for one entry of `workflow.tasks`.
pub struct TaskJsonBuilder {
    task: serde_json::Map<String, Value>,
    files: Vec<Value>,
}

impl TaskJsonBuilder {
    pub fn new(name: &str) -> Self {
        let mut task = serde_json::Map::new();
        task.insert("name".to_string(), json!(name));
        Self {
            task,
            files: Vec::new(),
        }
    }

    pub fn command(mut self, arguments: &[&str]) -> Self {
        self.task
            .insert("command".to_string(), json!({ "arguments": arguments }));
        self
    }

    pub fn parents(mut self, parents: &[&str]) -> Self {
        self.task.insert("parents".to_string(), json!(parents));
        self
    }

    /// Uses the source format's `childrens` spelling.
    pub fn childrens(mut self, children: &[&str]) -> Self {
        self.task.insert("childrens".to_string(), json!(children));
        self
    }

    pub fn input(self, file: &str) -> Self {
        self.file(file, "input")
    }

    pub fn output(self, file: &str) -> Self {
        self.file(file, "output")
    }

    pub fn file(mut self, file: &str, link: &str) -> Self {
        self.files.push(json!({ "name": file, "link": link }));
        self
    }

    pub fn build(mut self) -> Value {
        if !self.files.is_empty() {
            self.task.insert("files".to_string(), Value::Array(self.files));
        }
        Value::Object(self.task)
    }
}

/// Builder for `ConfigFile`.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn simulate(mut self, val: bool) -> Self {
        self.config.execution.simulate = val;
        self
    }

    /// Simulated durations of exactly zero, for fast tests.
    pub fn instant_simulation(mut self) -> Self {
        self.config.simulation.min_execution_time = 0.0;
        self.config.simulation.max_execution_time = 0.0;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.simulation.seed = Some(seed);
        self
    }

    pub fn simulate_task(mut self, name: &str, val: bool) -> Self {
        self.config
            .task
            .insert(name.to_string(), TaskOverride { simulate: Some(val) });
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
