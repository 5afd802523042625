use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use pubcohort_analysis::chart::{ChartPanel, CohortChart};
use ratatui::{
    DefaultTerminal, Frame,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    symbols::{Marker, merge::MergeStrategy},
    text::Text,
    widgets::{Axis, Block, Chart, Dataset, GraphType, Widget},
};

/// Line colors cycled over cohorts, oldest cohort first.
const SERIES_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Red,
    Color::Blue,
];

#[derive(Debug)]
pub struct App {
    chart: CohortChart,
    should_exit: bool,
}

impl App {
    pub fn new(chart: CohortChart) -> Self {
        Self {
            chart,
            should_exit: false,
        }
    }

    pub(crate) fn run(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        while !self.should_exit {
            terminal.draw(|f| self.draw(f))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let [chart_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        // Panels arrive group-major: one layout row per facet group, the
        // group's feature panels side by side within it.
        let mut rows: Vec<Vec<&ChartPanel>> = Vec::new();
        for panel in &self.chart.panels {
            match rows.last_mut() {
                Some(row) if row[0].group == panel.group => row.push(panel),
                _ => rows.push(vec![panel]),
            }
        }

        let row_areas = Layout::vertical(vec![Constraint::Fill(1); rows.len()]).split(chart_area);
        for (row, row_area) in rows.iter().zip(row_areas.iter()) {
            let panel_areas =
                Layout::horizontal(vec![Constraint::Fill(1); row.len()]).split(*row_area);
            for (panel, panel_area) in row.iter().zip(panel_areas.iter()) {
                frame.render_widget(
                    PanelChart {
                        panel,
                        chart: &self.chart,
                    },
                    *panel_area,
                );
            }
        }

        let help_text = Text::from("q/Esc: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .centered();
        frame.render_widget(help_text, help_area);
    }

    fn handle_events(&mut self) -> anyhow::Result<()> {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                if matches!(key_event.code, KeyCode::Char('q') | KeyCode::Esc) {
                    self.should_exit = true;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

struct PanelChart<'a> {
    panel: &'a ChartPanel,
    chart: &'a CohortChart,
}

impl Widget for PanelChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let datasets = self
            .panel
            .series
            .iter()
            .enumerate()
            .map(|(i, series)| {
                Dataset::default()
                    .name(series.cohort.clone())
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]))
                    .data(&series.points)
            })
            .collect::<Vec<_>>();

        let title = match &self.panel.group {
            Some(group) => format!("{group}: {}", self.panel.feature),
            None => self.panel.feature.clone(),
        };

        let [x_min, x_max] = self.chart.x_bounds;
        let x_axis = Axis::default()
            .title("Year")
            .bounds(self.chart.x_bounds)
            .labels([
                format!("{x_min:.0}"),
                format!("{:.0}", f64::midpoint(x_min, x_max)),
                format!("{x_max:.0}"),
            ]);
        let [y_min, y_max] = self.chart.y_bounds;
        let y_axis = Axis::default()
            .title(self.chart.y_label)
            .bounds(self.chart.y_bounds)
            .labels([
                format!("{y_min:.2}"),
                format!("{:.2}", f64::midpoint(y_min, y_max)),
                format!("{y_max:.2}"),
            ]);

        let chart = Chart::new(datasets)
            .block(
                Block::bordered()
                    .title(title)
                    .merge_borders(MergeStrategy::Exact),
            )
            .x_axis(x_axis)
            .y_axis(y_axis);
        Widget::render(chart, area, buf);
    }
}
