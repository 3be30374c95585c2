use predicates::prelude::*;
use test_support::{commit_date_cmd, commit_dates, conflicted_rebase, init_fixture_repo, BASE_DATE, NOW, TOPIC_AUTHOR_DATE};

#[test]
fn prints_commit_without_running_it() {
  let repo = init_fixture_repo();
  let expected = format!("GIT_AUTHOR_DATE={NOW} GIT_COMMITTER_DATE={NOW} git commit -m 'two words'\n");

  commit_date_cmd(repo.path())
    .args(["--yes", "--dry-run", "--", "-m", "two words"])
    .assert()
    .success()
    .stdout(predicate::eq(expected));

  assert_eq!(commit_dates(repo.path(), "HEAD").0, BASE_DATE);
}

#[test]
fn prints_amend_with_explicit_date() {
  let repo = init_fixture_repo();
  commit_date_cmd(repo.path())
    .args(["--yes", "--dry-run", "--amend"])
    .assert()
    .success()
    .stdout(predicate::str::contains(format!("git commit --amend --date={BASE_DATE}")));
}

#[test]
fn prints_rebase_steps() {
  let repo = conflicted_rebase(&[]);
  commit_date_cmd(repo.path())
    .args(["--yes", "--dry-run"])
    .assert()
    .success()
    .stdout(
      predicate::str::contains(format!("# set GIT_AUTHOR_DATE='{TOPIC_AUTHOR_DATE}'"))
        .and(predicate::str::contains("git rebase --continue")),
    );
}
