//! # Trigger Evaluation
//!
//! Decides whether a run should proceed for a parsed context. Rules are
//! evaluated in a fixed order and the first one that applies decides:
//!
//! 1. A non-empty direct prompt always triggers.
//! 2. An issue assignment with an assignee trigger configured triggers iff
//!    that user is among the assignees. No later rule is consulted.
//! 3. An opened issue triggers iff its body contains the trigger phrase.
//! 4. Otherwise the comment or review body is searched for the phrase.

use tracing::debug;

use crate::context::{EventPayload, ParsedContext};

/// Outcome of trigger evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerDecision {
  pub should_run: bool,
  pub trigger_content: Option<String>,
}

impl TriggerDecision {
  const fn skip() -> Self {
    Self {
      should_run: false,
      trigger_content: None,
    }
  }
}

/// Evaluate whether the context should trigger a run
pub fn evaluate(context: &ParsedContext) -> TriggerDecision {
  if !context.inputs.direct_prompt.is_empty() {
    debug!("Direct prompt provided, triggering unconditionally");
    return TriggerDecision {
      should_run: true,
      trigger_content: Some(context.inputs.direct_prompt.clone()),
    };
  }

  if !contains_trigger(context) {
    return TriggerDecision::skip();
  }

  TriggerDecision {
    should_run: true,
    trigger_content: extract_trigger_content(context),
  }
}

/// The trigger rules without the direct-prompt bypass
fn contains_trigger(context: &ParsedContext) -> bool {
  let inputs = &context.inputs;

  if context.is_issues_assigned_event() && !inputs.assignee_trigger.is_empty() {
    let wanted = inputs.assignee_trigger.trim_start_matches('@');
    let assigned = match &context.payload {
      EventPayload::Issues(event) => event.issue.assignees.iter().any(|a| a.login == wanted),
      _ => false,
    };
    debug!(assignee = wanted, assigned, "Evaluated assignee trigger");
    return assigned;
  }

  let phrase = inputs.trigger_phrase.as_str();

  if context.is_issues_opened_event() {
    return match &context.payload {
      EventPayload::Issues(event) => body_contains(event.issue.body.as_deref(), phrase),
      _ => false,
    };
  }

  match &context.payload {
    EventPayload::IssueComment(event) => body_contains(event.comment.body.as_deref(), phrase),
    EventPayload::PullRequestReview(event) => body_contains(event.review.body.as_deref(), phrase),
    EventPayload::PullRequestReviewComment(event) => body_contains(event.comment.body.as_deref(), phrase),
    EventPayload::Issues(_) | EventPayload::PullRequest(_) => false,
  }
}

fn body_contains(body: Option<&str>, phrase: &str) -> bool {
  body.is_some_and(|body| !body.is_empty() && body.contains(phrase))
}

/// The text a trigger phrase would be searched in: the issue body for issue
/// events, the comment or review body otherwise, `None` for kinds with no
/// such text
pub fn extract_trigger_content(context: &ParsedContext) -> Option<String> {
  let body = match &context.payload {
    EventPayload::IssueComment(event) => &event.comment.body,
    EventPayload::PullRequestReview(event) => &event.review.body,
    EventPayload::PullRequestReviewComment(event) => &event.comment.body,
    EventPayload::Issues(event) => &event.issue.body,
    EventPayload::PullRequest(_) => return None,
  };
  Some(body.clone().unwrap_or_default())
}

#[cfg(test)]
mod tests {
  use pilot_test_utils::payloads;
  use serde_json::Value;
  use test_case::test_case;

  use super::*;
  use crate::context::Inputs;

  fn inputs() -> Inputs {
    Inputs {
      trigger_phrase: "@claude".to_string(),
      ..Default::default()
    }
  }

  fn context_with(event_name: &str, payload: Value, inputs: Inputs) -> ParsedContext {
    ParsedContext::from_payload(event_name, payload, "octo/repo", "1", "alice", inputs).unwrap()
  }

  fn context(event_name: &str, payload: Value) -> ParsedContext {
    context_with(event_name, payload, inputs())
  }

  #[test]
  fn test_direct_prompt_always_triggers() {
    let inputs = Inputs {
      direct_prompt: "Summarise this PR".to_string(),
      ..inputs()
    };
    // No trigger phrase anywhere and an event kind that never triggers otherwise
    let ctx = context_with("pull_request", payloads::pull_request(5, "synchronize"), inputs);
    let decision = evaluate(&ctx);
    assert!(decision.should_run);
    assert_eq!(decision.trigger_content.as_deref(), Some("Summarise this PR"));
  }

  #[test]
  fn test_direct_prompt_bypasses_assignee_rule() {
    let inputs = Inputs {
      direct_prompt: "go".to_string(),
      assignee_trigger: "@claude-bot".to_string(),
      ..inputs()
    };
    let ctx = context_with("issues", payloads::issue_assigned(3, &["someone-else"]), inputs);
    assert!(evaluate(&ctx).should_run);
  }

  #[test_case(&["claude-bot"], true ; "assignee present")]
  #[test_case(&["alice", "claude-bot"], true ; "assignee among several")]
  #[test_case(&["alice"], false ; "assignee absent")]
  #[test_case(&[], false ; "no assignees")]
  fn test_assignee_trigger(assignees: &[&str], expected: bool) {
    let inputs = Inputs {
      assignee_trigger: "@claude-bot".to_string(),
      ..inputs()
    };
    let ctx = context_with("issues", payloads::issue_assigned(3, assignees), inputs);
    assert_eq!(evaluate(&ctx).should_run, expected);
  }

  #[test]
  fn test_assignee_rule_never_falls_through_to_body() {
    // The assigned payload's body contains the trigger phrase, but the
    // assignee rule alone decides.
    let inputs = Inputs {
      assignee_trigger: "claude-bot".to_string(),
      ..inputs()
    };
    let ctx = context_with("issues", payloads::issue_assigned(3, &["alice"]), inputs);
    assert!(!evaluate(&ctx).should_run);
  }

  #[test]
  fn test_assigned_without_assignee_trigger_does_not_trigger() {
    let ctx = context("issues", payloads::issue_assigned(3, &["claude-bot"]));
    assert!(!evaluate(&ctx).should_run);
  }

  #[test_case(Some("please @claude help"), true ; "phrase present")]
  #[test_case(Some("please help"), false ; "phrase absent")]
  #[test_case(Some("please @Claude help"), false ; "case sensitive")]
  #[test_case(None, false ; "no body")]
  fn test_issue_opened(body: Option<&str>, expected: bool) {
    let ctx = context("issues", payloads::issue_opened(4, body));
    assert_eq!(evaluate(&ctx).should_run, expected);
  }

  #[test]
  fn test_issue_opened_trigger_content_is_body() {
    let ctx = context("issues", payloads::issue_opened(4, Some("please @claude help")));
    let decision = evaluate(&ctx);
    assert_eq!(decision.trigger_content.as_deref(), Some("please @claude help"));
  }

  #[test]
  fn test_other_issue_actions_do_not_trigger() {
    let ctx = context("issues", payloads::issue_event(4, "edited", Some("@claude now")));
    assert!(!evaluate(&ctx).should_run);
  }

  #[test_case("issue_comment", payloads::issue_comment(1, "hey @claude fix", false), true ; "issue comment hit")]
  #[test_case("issue_comment", payloads::issue_comment(1, "hey there", false), false ; "issue comment miss")]
  #[test_case("pull_request_review", payloads::pull_request_review(2, Some("@claude address these")), true ; "review hit")]
  #[test_case("pull_request_review", payloads::pull_request_review(2, None), false ; "review without body")]
  #[test_case("pull_request_review_comment", payloads::pull_request_review_comment(2, "@claude rename"), true ; "review comment hit")]
  #[test_case("pull_request_review_comment", payloads::pull_request_review_comment(2, "rename"), false ; "review comment miss")]
  #[test_case("pull_request", payloads::pull_request(2, "opened"), false ; "pull request never triggers")]
  fn test_comment_rules(event_name: &str, payload: Value, expected: bool) {
    let ctx = context(event_name, payload);
    assert_eq!(evaluate(&ctx).should_run, expected);
  }

  #[test]
  fn test_custom_trigger_phrase() {
    let inputs = Inputs {
      trigger_phrase: "/pilot".to_string(),
      ..Default::default()
    };
    let ctx = context_with("issue_comment", payloads::issue_comment(1, "/pilot run tests", false), inputs);
    assert!(evaluate(&ctx).should_run);
  }

  #[test]
  fn test_extract_content_is_independent_of_match() {
    let ctx = context("issue_comment", payloads::issue_comment(1, "no phrase here", false));
    assert!(!evaluate(&ctx).should_run);
    assert_eq!(extract_trigger_content(&ctx).as_deref(), Some("no phrase here"));
  }

  #[test]
  fn test_extract_content_per_kind() {
    let ctx = context("pull_request_review", payloads::pull_request_review(2, Some("review text")));
    assert_eq!(extract_trigger_content(&ctx).as_deref(), Some("review text"));

    let ctx = context("pull_request_review_comment", payloads::pull_request_review_comment(2, "inline"));
    assert_eq!(extract_trigger_content(&ctx).as_deref(), Some("inline"));

    let ctx = context("issues", payloads::issue_event(2, "edited", None));
    assert_eq!(extract_trigger_content(&ctx).as_deref(), Some(""));

    let ctx = context("pull_request", payloads::pull_request(2, "opened"));
    assert_eq!(extract_trigger_content(&ctx), None);
  }
}
