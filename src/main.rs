use anyhow::Result;
use clap::Parser;
use tracing::info;

mod batch;
mod cli;
mod clock;
mod form;
mod gitio;
mod model;
mod presets;
mod rules;
mod snapshot;
mod submit;
mod tui;
mod util;

use crate::cli::{Cli, Mode, normalize};
use crate::form::CommitForm;
use crate::model::SessionOutcome;
use crate::snapshot::GitProbe;

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  util::init_logging(cli.verbose);

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: read the repository once and build the form
  let probe = GitProbe::open(&cfg.repo)?;
  let snapshot = snapshot::capture(&probe);
  info!(
    repo = probe.root(),
    has_head = snapshot.has_head(),
    rebase = snapshot.is_rebase(),
    merge = snapshot.is_merge(),
    zone = ?cfg.clock.zone(),
    "repository state"
  );
  let mut form = CommitForm::new(snapshot.clone(), cfg.clock.clone());
  batch::apply_seeds(&mut form, &cfg.seeds)?;

  // Phase 3: run the session
  let outcome = match cfg.mode {
    Mode::PrintState => {
      println!("{}", serde_json::to_string_pretty(&form.report())?);
      return Ok(());
    }
    Mode::Batch => batch::run(&form),
    Mode::Interactive => tui::run(form, cfg.tick)?,
  };

  let request = match outcome {
    SessionOutcome::Cancelled => {
      info!("cancelled; nothing was committed");
      return Ok(());
    }
    SessionOutcome::Submitted(request) => request,
  };

  // Phase 4: hand the dates to git
  let plan = submit::plan(&snapshot, &request, &cfg.git_args);
  if cfg.dry_run {
    print!("{plan}");
    return Ok(());
  }
  submit::execute(probe.root(), probe.rebase_dir(), &plan)
}
