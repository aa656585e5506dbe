// src/workflow/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::errors::Result;
use crate::workflow::model::RawWorkflowFile;
use crate::workflow::{TaskRecord, Workflow};

/// Load a workflow description from a JSON file.
///
/// This only deserializes and converts tasks into [`TaskRecord`]s; it does
/// **not** check names or dependencies. Building a
/// [`LeveledPlan`](crate::dag::LeveledPlan) does that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Workflow> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading workflow");
    let contents = fs::read_to_string(path)?;
    load_from_str(&contents)
}

/// Parse a workflow description from a JSON string.
pub fn load_from_str(contents: &str) -> Result<Workflow> {
    let raw: RawWorkflowFile = serde_json::from_str(contents)?;
    Ok(Workflow::from(raw))
}

impl From<RawWorkflowFile> for Workflow {
    fn from(raw: RawWorkflowFile) -> Self {
        let tasks: Vec<TaskRecord> = raw
            .workflow
            .tasks
            .into_iter()
            .map(TaskRecord::from)
            .collect();
        debug!(workflow = %raw.name, tasks = tasks.len(), "workflow parsed");
        Workflow {
            name: raw.name,
            tasks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document() {
        let wf = load_from_str(
            r#"{
                "name": "seq",
                "workflow": {
                    "tasks": [
                        { "name": "T1", "files": [{ "name": "f1", "link": "output" }] },
                        { "name": "T2", "childrens": ["T3"], "parents": ["T1"] },
                        { "name": "T3", "command": { "arguments": ["true"] } }
                    ]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(wf.name, "seq");
        assert_eq!(wf.tasks.len(), 3);
        assert!(wf.tasks[0].outputs().contains("f1"));
        assert!(wf.tasks[1].children().contains("T3"));
        assert!(wf.tasks[1].parents().contains("T1"));
        assert_eq!(wf.tasks[2].command(), Some(&["true".to_string()][..]));
    }

    #[test]
    fn accepts_children_alias_and_ignores_unknown_fields() {
        let wf = load_from_str(
            r#"{
                "name": "alias",
                "schemaVersion": "1.4",
                "workflow": {
                    "makespan": 12,
                    "tasks": [ { "name": "A", "children": ["B"], "runtime": 3.5 } ]
                }
            }"#,
        )
        .unwrap();

        assert!(wf.tasks[0].children().contains("B"));
    }

    #[test]
    fn missing_name_is_a_json_error() {
        let err = load_from_str(r#"{ "workflow": { "tasks": [] } }"#).unwrap_err();
        assert!(matches!(err, crate::errors::WfdagError::JsonError(_)));
    }
}
