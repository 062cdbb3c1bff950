use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE},
    summary::{
        aggregation::{MonthlyTotal, aggregate_by_month, get_report_rows},
        chart::{SummaryChart, chart_view, monthly_totals_chart},
    },
};

const CHART_ID: &str = "monthly-totals-chart";

/// The state needed for the monthly summary.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database connection holding the transactions table.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Route handler for the monthly summary fragment.
///
/// Reads the whole transactions table, totals `amount` by the month of `date`
/// and responds with a bar chart and a table of the totals.
pub async fn get_monthly_summary(State(state): State<SummaryState>) -> Response {
    let rows = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_alert_response();
            }
        };

        get_report_rows(&connection)
    };

    let rows = match rows {
        Ok(rows) => rows,
        Err(error @ Error::MissingReportColumns(_)) => {
            tracing::warn!("Cannot build monthly summary: {error}");
            return error.into_alert_response();
        }
        Err(error) => {
            tracing::error!("Could not fetch data for the monthly summary: {error}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::ErrorSimple {
                    message: format!("Error fetching data: {error}"),
                }
                .into_html(),
            )
                .into_response();
        }
    };

    let totals = aggregate_by_month(&rows);

    if totals.is_empty() {
        return summary_no_data_view().into_response();
    }

    let chart = SummaryChart {
        id: CHART_ID,
        options: monthly_totals_chart(&totals).to_string(),
    };

    summary_view(&chart, &totals).into_response()
}

fn summary_no_data_view() -> Markup {
    html!(
        div class="flex flex-col items-center text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold" { "Nothing here yet..." }

            p { "The chart will show up here once you upload a file with dated transactions." }
        }
    )
}

fn summary_view(chart: &SummaryChart, totals: &[MonthlyTotal]) -> Markup {
    html!(
        div id="monthly-summary" class="w-full text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold mb-4" { "Monthly Totals:" }

            (chart_view(chart))

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                        }
                    }

                    tbody
                    {
                        @for total in totals {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (total.month.to_string()) }
                                td class=(TABLE_CELL_STYLE) { (format!("{:.2}", total.total)) }
                            }
                        }
                    }
                }
            }
        }
    )
}
