use pubcohort_analysis::chart::CohortChart;

use self::app::App;

mod app;

pub(crate) fn run_tui(chart: CohortChart) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    let app_result = App::new(chart).run(&mut terminal);
    ratatui::restore();
    app_result
}
