//! Limited-use class actions such as Second Wind or Channel Divinity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_ACTION_USES: u32 = 99;

/// An action with a fixed number of uses between rests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassAction {
    pub id: String,
    pub name: String,
    pub description: String,
    pub gained_from: String,
    pub currently_used: u32,
    pub max_uses: u32,
}

impl ClassAction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: String::new(),
            gained_from: String::new(),
            currently_used: 0,
            max_uses: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_gained_from(mut self, source: impl Into<String>) -> Self {
        self.gained_from = source.into();
        self
    }

    pub fn with_max_uses(mut self, max_uses: u32) -> Self {
        self.max_uses = max_uses.min(MAX_ACTION_USES);
        self
    }

    /// Uses left. Negative when stored data is over-used.
    pub fn remaining(&self) -> i64 {
        i64::from(self.max_uses) - i64::from(self.currently_used)
    }
}

impl Default for ClassAction {
    fn default() -> Self {
        Self::new("")
    }
}

/// The character's class actions, in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassActions(Vec<ClassAction>);

impl ClassActions {
    pub fn from_actions(actions: Vec<ClassAction>) -> Self {
        Self(actions)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassAction> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ClassAction> {
        self.0.iter().find(|action| action.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut ClassAction> {
        self.0.iter_mut().find(|action| action.id == id)
    }

    /// Append an action and return its id.
    pub fn add(&mut self, action: ClassAction) -> String {
        let id = action.id.clone();
        self.0.push(action);
        id
    }

    /// Remove an action by id. Returns false if it was not present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|action| action.id != id);
        self.0.len() != before
    }

    /// Spend one use. Returns false, changing nothing, if none remain.
    pub fn expend(&mut self, id: &str) -> bool {
        match self.get_mut(id) {
            Some(action) if action.remaining() > 0 => {
                action.currently_used += 1;
                true
            }
            _ => false,
        }
    }

    /// Set uses spent, clamped to `[0, 99]`. Returns false for an unknown id.
    pub fn set_used(&mut self, id: &str, used: i64) -> bool {
        match self.get_mut(id) {
            Some(action) => {
                action.currently_used = used.clamp(0, i64::from(MAX_ACTION_USES)) as u32;
                true
            }
            None => false,
        }
    }

    /// Set the use limit, clamped to `[0, 99]`.
    pub fn set_max(&mut self, id: &str, max: i64) -> bool {
        match self.get_mut(id) {
            Some(action) => {
                action.max_uses = max.clamp(0, i64::from(MAX_ACTION_USES)) as u32;
                true
            }
            None => false,
        }
    }

    /// Restore every use, as after a rest.
    pub fn reset_used(&mut self) {
        for action in &mut self.0 {
            action.currently_used = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn second_wind() -> ClassAction {
        ClassAction::new("Second Wind")
            .with_gained_from("Fighter 1")
            .with_max_uses(2)
    }

    #[test]
    fn test_expend_until_empty() {
        let mut actions = ClassActions::default();
        let id = actions.add(second_wind());

        assert!(actions.expend(&id));
        assert!(actions.expend(&id));
        assert!(!actions.expend(&id));
        assert_eq!(actions.get(&id).unwrap().remaining(), 0);
        assert!(!actions.expend("missing"));
    }

    #[test]
    fn test_reset_restores_uses() {
        let mut actions = ClassActions::from_actions(vec![second_wind()]);
        let id = actions.iter().next().unwrap().id.clone();
        actions.expend(&id);
        actions.reset_used();
        assert_eq!(actions.get(&id).unwrap().currently_used, 0);
    }

    #[test]
    fn test_set_clamps_and_reports_over_use() {
        let mut actions = ClassActions::default();
        let id = actions.add(second_wind());
        assert!(actions.set_used(&id, 5));
        assert_eq!(actions.get(&id).unwrap().remaining(), -3);
        assert!(actions.set_max(&id, 1_000));
        assert_eq!(actions.get(&id).unwrap().max_uses, 99);
        assert!(actions.set_used(&id, -4));
        assert_eq!(actions.get(&id).unwrap().currently_used, 0);
        assert!(!actions.set_max("missing", 3));
    }

    #[test]
    fn test_add_and_remove() {
        let mut actions = ClassActions::default();
        let first = actions.add(second_wind());
        let second = actions.add(ClassAction::new("Action Surge").with_max_uses(1));
        assert_eq!(actions.len(), 2);

        assert!(actions.remove(&first));
        assert!(!actions.remove(&first));
        assert_eq!(actions.len(), 1);
        assert_eq!(actions.iter().next().unwrap().id, second);
    }

    #[test]
    fn test_json_shape() {
        let json = r#"[{"id":"1700000000000","name":"Rage","description":"",
            "gainedFrom":"Barbarian 1","currentlyUsed":1,"maxUses":2}]"#;
        let actions: ClassActions = serde_json::from_str(json).unwrap();
        let rage = actions.get("1700000000000").unwrap();
        assert_eq!(rage.gained_from, "Barbarian 1");
        assert_eq!(rage.remaining(), 1);

        let encoded = serde_json::to_string(&actions).unwrap();
        assert!(encoded.contains("\"currentlyUsed\":1"));
        assert!(encoded.contains("\"maxUses\":2"));
    }
}
