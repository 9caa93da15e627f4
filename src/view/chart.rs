//! The bar chart of the aggregated amounts.
//!
//! The chart options are generated on the server with charming and shipped to
//! the page as JSON inside a `<script type="application/json">` element. Each
//! time a patch replaces that element the page script hands the new options
//! to ECharts.

use charming::{
    Chart,
    component::{Axis, Grid, Title, VisualMap, VisualMapPiece},
    element::{AxisPointer, AxisPointerType, AxisType, Tooltip, Trigger},
    series::bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    html::HeadElement,
    view::aggregation::{ChartMode, ChartSeries},
};

/// The element ID of the chart container.
pub const CHART_ID: &str = "chart";
/// The element ID of the JSON chart options.
pub const CHART_OPTIONS_ID: &str = "chart-options";

fn series_chart(mode: ChartMode, series: &ChartSeries) -> Chart {
    let chart = Chart::new()
        .title(Title::new().text(mode.label()))
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
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(series.labels.clone()),
        )
        .y_axis(Axis::new().type_(AxisType::Value));

    let chart = match mode {
        ChartMode::NetEvent | ChartMode::NetCategory => {
            chart.visual_map(VisualMap::new().show(false).pieces(vec![
                VisualMapPiece::new().lt(0).color("red"),
                VisualMapPiece::new().gte(0).color("green"),
            ]))
        }
        _ => chart,
    };

    chart.series(
        bar::Bar::new()
            .name(mode.label())
            .data(series.values.clone()),
    )
}

/// The ECharts options for `series` as JSON that is safe to embed in a script element.
pub fn chart_options(mode: ChartMode, series: &ChartSeries) -> String {
    series_chart(mode, series)
        .to_string()
        .replace('<', "\\u003c")
}

/// The chart container and its initial options.
pub fn chart_view(mode: ChartMode, series: &ChartSeries) -> Markup {
    html!(
        div id=(CHART_ID) class="w-full min-h-[380px] rounded dark:bg-gray-100" {}

        (chart_options_element(mode, series, false))
    )
}

/// The options element, set up to replace the current one when `out_of_band` is set.
pub fn chart_options_element(mode: ChartMode, series: &ChartSeries, out_of_band: bool) -> Markup {
    html!(
        script
            type="application/json"
            id=(CHART_OPTIONS_ID)
            data-mode=(mode.as_str())
            hx-swap-oob=[out_of_band.then_some("true")]
        {
            (PreEscaped(chart_options(mode, series)))
        }
    )
}

/// Creates the ECharts instance and redraws it whenever new options arrive.
pub fn chart_script() -> HeadElement {
    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chartDom = document.getElementById("{CHART_ID}");
            if (!chartDom) return;

            const chart = echarts.init(chartDom);
            const currencyFormatter = new Intl.NumberFormat('en-US', {{
                style: 'currency',
                currency: 'USD'
            }});
            let lastOptions = null;

            const render = () => {{
                const element = document.getElementById("{CHART_OPTIONS_ID}");
                if (!element || element.textContent === lastOptions) return;

                lastOptions = element.textContent;
                const option = JSON.parse(lastOptions);
                option.tooltip = Object.assign({{}}, option.tooltip, {{
                    valueFormatter: (number) => currencyFormatter.format(number)
                }});
                chart.setOption(option, true);
            }};

            window.addEventListener('resize', chart.resize);
            document.body.addEventListener('htmx:sseMessage', render);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
            }};
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
            render();
        }});"#
    );

    HeadElement::ScriptSource(PreEscaped(script))
}
