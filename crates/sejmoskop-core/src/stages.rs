//! Stage-tree flattening for Sejm legislative processes.
//!
//! The Sejm API describes a bill's journey as a nested tree of stages
//! (readings contain committee sessions, committee sessions contain
//! subcommittee sessions, and so on). Downstream code wants a flat,
//! chronological event list, so this module walks the tree depth-first
//! and emits one [`Event`] per stage that actually happened — i.e. per
//! node carrying both a name and a date.

use serde::{Deserialize, Deserializer, Serialize};

/// Recursion cap for stage trees. Real trees are 2–4 levels deep; anything
/// past this is treated as malformed input and not visited.
pub const MAX_STAGE_DEPTH: usize = 20;

/// One node of the Sejm API's nested process-stages structure.
///
/// The vocabulary is uncontrolled free text ("I czytanie", "Sprawozdanie
/// komisji", ...), not an enum. Every field is optional on the wire and
/// unknown fields are ignored; a stage scheduled but not yet held arrives
/// without a `date`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StageNode {
    #[serde(default, rename = "stageName")]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub decision: Option<String>,
    #[serde(default, deserialize_with = "lenient_children")]
    pub children: Vec<StageNode>,
}

/// A flattened, dated, named occurrence derived from one stage node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The originating stage's free-text name.
    pub event_type: String,
    /// ISO 8601 date or datetime string, as received from the API.
    pub event_date: String,
    /// Stage annotation: `comment` if present, else `decision`.
    pub description: Option<String>,
}

/// Accept `children` that is missing, null, or not an array at all — the
/// upstream API is not consistent here and a scalar in that slot must read
/// as "no children", not a parse failure. Array elements that are not
/// objects are dropped for the same reason.
fn lenient_children<'de, D>(deserializer: D) -> Result<Vec<StageNode>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// Flatten an ordered stage forest into an unsorted event list.
///
/// Depth-first, pre-order: a node's own event (when it has both a name and
/// a date) is emitted before its children are visited. A dated node with
/// children contributes its own event AND its children's — nesting never
/// suppresses emission. Nodes missing either field are skipped silently;
/// this function has no failure mode.
///
/// The output is deliberately unsorted — chronological ordering is a
/// separate step, see [`sort_by_date`](crate::sort_by_date).
pub fn flatten(stages: &[StageNode]) -> Vec<Event> {
    let mut events = Vec::new();
    walk(stages, 0, &mut events);
    events
}

fn walk(nodes: &[StageNode], depth: usize, out: &mut Vec<Event>) {
    if depth >= MAX_STAGE_DEPTH {
        tracing::warn!(depth, "stage tree exceeds depth cap, pruning");
        return;
    }
    for node in nodes {
        if let (Some(name), Some(date)) = (&node.name, &node.date) {
            out.push(Event {
                event_type: name.clone(),
                event_date: date.clone(),
                description: node.comment.clone().or_else(|| node.decision.clone()),
            });
        }
        walk(&node.children, depth + 1, out);
    }
}
