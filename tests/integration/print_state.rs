use serde_json::Value;
use test_support::{
  commit_date_cmd, conflicted_rebase, edit_stop_rebase, init_fixture_repo, init_repo, pending_merge, BASE_DATE,
  MAIN_DATE, NOW, TOPIC_AUTHOR_DATE, TOPIC_COMMIT_DATE,
};

fn print_state(repo: &std::path::Path, extra: &[&str]) -> Value {
  let out = commit_date_cmd(repo).arg("--print-state").args(extra).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).unwrap()
}

fn labels(v: &Value) -> Vec<String> {
  v["presets"]
    .as_array()
    .unwrap()
    .iter()
    .map(|p| p["label"].as_str().unwrap().to_string())
    .collect()
}

#[test]
fn unborn_repo_offers_only_now() {
  let repo = init_repo();
  let v = print_state(repo.path(), &[]);
  assert!(v["snapshot"]["head"].is_null());
  assert_eq!(labels(&v), ["Now"]);
  assert_eq!(v["rules"]["amend_available"], false);
  assert_eq!(v["rules"]["action"], "commit");
  assert_eq!(v["author"]["value"], NOW);
  assert_eq!(v["commit"]["value"], NOW);
}

#[test]
fn plain_repo_defaults_to_now_with_head_preset() {
  let repo = init_fixture_repo();
  let v = print_state(repo.path(), &[]);
  assert_eq!(v["snapshot"]["head"]["dates"]["author"], BASE_DATE);
  assert!(v["snapshot"]["head"].get("rebase").is_none());
  assert_eq!(labels(&v), ["Now", "HEAD Date"]);
  assert_eq!(v["presets"][1]["value"]["fixed"], BASE_DATE);
  assert_eq!(v["rules"]["author"]["kind"], "free");
  assert_eq!(v["rules"]["amend_available"], true);
  assert_eq!(v["author"]["lock"]["kind"], "open");
  assert_eq!(v["link"]["checked"], true);
  assert!(v["rules"].get("notice").is_none());
}

#[test]
fn amend_forces_head_author_date() {
  let repo = init_fixture_repo();
  let v = print_state(repo.path(), &["--amend"]);
  assert_eq!(v["amend"], true);
  assert_eq!(labels(&v), ["Now", "Current Date"]);
  assert_eq!(v["rules"]["action"], "amend");
  assert_eq!(v["author"]["value"], BASE_DATE);
  assert_eq!(v["author"]["lock"]["kind"], "forced");
  assert_eq!(v["commit"]["value"], NOW);
  assert_eq!(v["link"]["checked"], false);
}

#[test]
fn pending_merge_offers_our_and_their_dates() {
  let repo = pending_merge();
  let v = print_state(repo.path(), &[]);
  assert_eq!(
    labels(&v),
    ["Now", "Our Date", "Their Author Date", "Their Commit Date"]
  );
  assert_eq!(v["presets"][1]["value"]["fixed"], MAIN_DATE);
  assert_eq!(v["presets"][2]["value"]["fixed"], TOPIC_AUTHOR_DATE);
  assert_eq!(v["presets"][3]["value"]["fixed"], TOPIC_COMMIT_DATE);
  assert_eq!(v["rules"]["action"], "commit");
}

#[test]
fn conflicted_rebase_forces_former_author_date() {
  let repo = conflicted_rebase(&[]);
  let v = print_state(repo.path(), &[]);
  let rebase = &v["snapshot"]["head"]["rebase"];
  assert_eq!(rebase["dates"]["author"], TOPIC_AUTHOR_DATE);
  assert_eq!(rebase["flags"]["rebase_head_is_head"], false);
  assert_eq!(rebase["flags"]["author_date_is_now"], false);
  assert_eq!(
    labels(&v),
    ["Now", "Former Author Date", "Former Commit Date", "HEAD Date"]
  );
  assert_eq!(v["rules"]["action"], "continue");
  assert_eq!(v["rules"]["amend_available"], false);
  assert!(v["rules"]["notice"].as_str().unwrap().contains("all modified commits"));
  assert_eq!(v["author"]["value"], TOPIC_AUTHOR_DATE);
  assert_eq!(v["author"]["lock"]["kind"], "forced");
}

#[test]
fn resolved_rebase_without_changes_reuses_former_commit_date() {
  let repo = conflicted_rebase(&[]);
  // resolve to HEAD's version: nothing left staged
  test_support::run(repo.path(), &["checkout", "HEAD", "--", "file.txt"]);
  let v = print_state(repo.path(), &[]);
  assert_eq!(v["snapshot"]["head"]["rebase"]["flags"]["has_staged_changes"], false);
  assert_eq!(v["commit"]["value"], TOPIC_COMMIT_DATE);
  assert_eq!(v["link"]["checked"], false);
}

#[test]
fn ignore_date_rebase_tracks_now() {
  let repo = conflicted_rebase(&["--ignore-date"]);
  let v = print_state(repo.path(), &[]);
  assert_eq!(v["snapshot"]["head"]["rebase"]["flags"]["author_date_is_now"], true);
  assert_eq!(v["rules"]["author"]["kind"], "tracks_now");
  assert_eq!(v["author"]["value"], NOW);
}

#[test]
fn committer_date_is_author_date_rebase_locks_the_link() {
  let repo = conflicted_rebase(&["--committer-date-is-author-date"]);
  let v = print_state(repo.path(), &[]);
  assert_eq!(v["rules"]["commit"]["kind"], "alternative");
  assert_eq!(v["rules"]["commit"]["source"], "author");
  assert_eq!(v["link"]["checked"], true);
  assert!(v["link"]["forced_reason"].is_string());
  assert_eq!(v["commit"]["value"], TOPIC_AUTHOR_DATE);
}

#[test]
fn edit_stop_is_replayed_in_place() {
  let repo = edit_stop_rebase();
  let v = print_state(repo.path(), &[]);
  let flags = &v["snapshot"]["head"]["rebase"]["flags"];
  assert_eq!(flags["amend_pending"], true);
  assert_eq!(flags["rebase_head_is_head"], true);
  assert!(labels(&v).iter().all(|l| !l.starts_with("Former")));
}
