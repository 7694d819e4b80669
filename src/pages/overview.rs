use leptos::prelude::*;

use crate::data::Dataset;

const PREVIEW_ROWS: usize = 20;
const PREVIEW_INDICATORS: usize = 5;

/// Dataset overview: headline metrics and a small preview table.
#[component]
pub fn Overview() -> impl IntoView {
	match super::bundled_dataset() {
		Ok(dataset) => view! { <OverviewContent dataset /> }.into_any(),
		Err(err) => view! {
			<div class="load-error">
				<h1>"Overview"</h1>
				<p>"Failed to load the dataset: " {err.to_string()}</p>
			</div>
		}
		.into_any(),
	}
}

#[component]
fn OverviewContent(dataset: Dataset) -> impl IntoView {
	let country_count = dataset.countries().len();
	let year_span = dataset
		.year_range()
		.map(|(min, max)| format!("{}-{}", min, max))
		.unwrap_or_else(|| "–".to_string());
	let row_count = dataset.records().len();
	let column_count = dataset.column_count();

	let indicator_headers: Vec<String> = dataset
		.indicator_columns()
		.iter()
		.take(PREVIEW_INDICATORS)
		.cloned()
		.collect();
	let preview: Vec<_> = dataset
		.records()
		.iter()
		.take(PREVIEW_ROWS)
		.map(|record| {
			let cells: Vec<String> = (0..indicator_headers.len())
				.map(|idx| {
					record
						.indicator(idx)
						.map(|v| format!("{:.2}", v))
						.unwrap_or_else(|| "–".to_string())
				})
				.collect();
			(record.iso3.clone(), record.year, cells)
		})
		.collect();

	view! {
		<div class="overview">
			<h1>"Overview"</h1>
			<div class="metrics">
				<Metric label="Countries" value=country_count.to_string() />
				<Metric label="Years" value=year_span />
				<Metric label="Rows" value=row_count.to_string() />
				<Metric label="Columns" value=column_count.to_string() />
			</div>
			<h2>"Dataset Preview"</h2>
			<table class="preview">
				<thead>
					<tr>
						<th>"ISO3"</th>
						<th>"Year"</th>
						{indicator_headers
							.iter()
							.map(|h| view! { <th>{h.clone()}</th> })
							.collect_view()}
					</tr>
				</thead>
				<tbody>
					{preview
						.into_iter()
						.map(|(iso3, year, cells)| {
							view! {
								<tr>
									<td>{iso3}</td>
									<td>{year}</td>
									{cells.into_iter().map(|c| view! { <td>{c}</td> }).collect_view()}
								</tr>
							}
						})
						.collect_view()}
				</tbody>
			</table>
			<a class="nav-link" href="/">"Back to the trade network"</a>
		</div>
	}
}

#[component]
fn Metric(label: &'static str, value: String) -> impl IntoView {
	view! {
		<div class="metric">
			<span class="metric-label">{label}</span>
			<span class="metric-value">{value}</span>
		</div>
	}
}
