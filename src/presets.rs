use crate::model::{DatePair, Preset, PresetValue, RepoSnapshot, Timestamp};

fn fixed(label: String, tooltip: Option<String>, value: &Timestamp) -> Preset {
  Preset { label, tooltip, value: PresetValue::Fixed(value.clone()) }
}

/// One preset when both dates agree, otherwise an author/commit pair.
fn push_group(
  presets: &mut Vec<Preset>,
  prefix: &str,
  dates: &DatePair,
  joint_tooltip: String,
  split_tooltips: Option<(String, String)>,
) {
  if dates.is_uniform() {
    presets.push(fixed(format!("{prefix} Date"), Some(joint_tooltip), &dates.author));
    return;
  }
  let (author_tip, commit_tip) = match split_tooltips {
    Some((a, c)) => (Some(a), Some(c)),
    None => (None, None),
  };
  presets.push(fixed(format!("{prefix} Author Date"), author_tip, &dates.author));
  presets.push(fixed(format!("{prefix} Commit Date"), commit_tip, &dates.commit));
}

/// Date presets offered to both fields, in display order:
/// Now, Former (rebase), HEAD/Our/Current, Their (merge).
pub fn derive_presets(snapshot: &RepoSnapshot, amend_intent: bool) -> Vec<Preset> {
  let mut presets = vec![Preset {
    label: "Now".into(),
    tooltip: None,
    value: PresetValue::Now,
  }];

  if let Some(rebase) = snapshot.rebase() {
    if !rebase.flags.rebase_head_is_head {
      push_group(
        &mut presets,
        "Former",
        &rebase.dates,
        "Author and commit date for the commit being applied to HEAD".into(),
        Some((
          "Author date for the commit being applied to HEAD".into(),
          "Commit date for the commit being applied to HEAD".into(),
        )),
      );
    }
  }

  if let Some(head) = snapshot.head_dates() {
    let label = if snapshot.is_merge() {
      "Our"
    } else if amend_intent {
      "Current"
    } else {
      "HEAD"
    };
    push_group(&mut presets, label, head, format!("{label} author and commit date"), None);
  }

  if let Some(theirs) = snapshot.merge_head_dates() {
    push_group(&mut presets, "Their", theirs, "Their author and commit date".into(), None);
  }

  presets
}
