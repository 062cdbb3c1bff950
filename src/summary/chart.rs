//! Bar chart of the monthly totals.
//!
//! The chart is built as an ECharts configuration with charming and
//! initialised by an inline script, so that it works when the summary is
//! swapped into the page by htmx.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Tooltip, Trigger},
    series::bar,
};
use maud::{Markup, PreEscaped, html};

use crate::summary::aggregation::MonthlyTotal;

/// A chart with its HTML container ID and ECharts configuration.
pub(super) struct SummaryChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// A bar per month with the month labels on the x axis and the totals on the y axis.
pub(super) fn monthly_totals_chart(totals: &[MonthlyTotal]) -> Chart {
    let labels: Vec<String> = totals.iter().map(|total| total.month.to_string()).collect();
    let values: Vec<f64> = totals.iter().map(|total| total.total).collect();

    Chart::new()
        .title(Title::new().text("Monthly Totals"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(bar::Bar::new().name("Total").data(values))
}

/// Renders the chart container followed by the script that draws the chart in it.
pub(super) fn chart_view(chart: &SummaryChart) -> Markup {
    html!(
        div
            id=(chart.id)
            class="w-full min-h-[380px] mb-4 rounded dark:bg-gray-100"
        {}

        script { (PreEscaped(chart_script(chart))) }
    )
}

fn chart_script(chart: &SummaryChart) -> String {
    format!(
        r#"(function() {{
            const chartDom = document.getElementById("{}");
            const chart = echarts.init(chartDom);
            const option = {};
            chart.setOption(option);

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                const isDarkMode = darkModeMediaQuery.matches;
                chart.setTheme(isDarkMode ? 'dark' : 'default');
            }}
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }})();"#,
        chart.id, chart.options
    )
}
