//! Event payload builders
//!
//! Minimal payloads shaped like the ones the hosting pipeline delivers, with
//! just enough fields for context parsing and trigger evaluation.

use serde_json::{Value, json};

fn user(login: &str) -> Value {
  json!({ "login": login, "id": 1, "type": "User" })
}

/// `issues` / `opened`
pub fn issue_opened(number: u64, body: Option<&str>) -> Value {
  json!({
    "action": "opened",
    "issue": {
      "number": number,
      "title": "Something is broken",
      "body": body,
      "user": user("alice"),
      "assignees": []
    }
  })
}

/// `issues` / `assigned` with the given assignee logins
pub fn issue_assigned(number: u64, assignees: &[&str]) -> Value {
  let assignees: Vec<Value> = assignees.iter().map(|login| user(login)).collect();
  json!({
    "action": "assigned",
    "issue": {
      "number": number,
      "title": "Please take this",
      "body": "@claude implement the feature",
      "user": user("alice"),
      "assignees": assignees
    },
    "assignee": assignees.first().cloned().unwrap_or(Value::Null)
  })
}

/// `issues` with an arbitrary action
pub fn issue_event(number: u64, action: &str, body: Option<&str>) -> Value {
  json!({
    "action": action,
    "issue": {
      "number": number,
      "title": "Something is broken",
      "body": body,
      "user": user("alice"),
      "assignees": []
    }
  })
}

/// `issue_comment` / `created`; `on_pull_request` marks the conversation as
/// a pull request
pub fn issue_comment(number: u64, body: &str, on_pull_request: bool) -> Value {
  let mut issue = json!({
    "number": number,
    "title": "Something is broken",
    "body": "original description",
    "user": user("alice"),
    "assignees": []
  });
  if on_pull_request {
    issue["pull_request"] = json!({ "url": format!("https://api.github.com/repos/octo/repo/pulls/{number}") });
  }
  json!({
    "action": "created",
    "issue": issue,
    "comment": { "id": 555, "body": body, "user": user("alice") }
  })
}

/// `pull_request` with the given action
pub fn pull_request(number: u64, action: &str) -> Value {
  json!({
    "action": action,
    "pull_request": {
      "number": number,
      "title": "Add feature",
      "body": "@claude please review",
      "head": { "ref": "feature/thing", "sha": "abc123" },
      "base": { "ref": "main", "sha": "def456" }
    }
  })
}

/// `pull_request_review` / `submitted`
pub fn pull_request_review(number: u64, body: Option<&str>) -> Value {
  json!({
    "action": "submitted",
    "pull_request": { "number": number },
    "review": { "id": 77, "body": body, "state": "commented" }
  })
}

/// `pull_request_review_comment` / `created`
pub fn pull_request_review_comment(number: u64, body: &str) -> Value {
  json!({
    "action": "created",
    "pull_request": { "number": number },
    "comment": { "id": 88, "body": body, "path": "src/lib.rs" }
  })
}
