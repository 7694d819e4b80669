use std::sync::Arc;

use leptos::prelude::*;
use log::warn;

use crate::components::force_graph::{ForceGraphCanvas, GraphData, GraphLink, GraphNode};
use crate::data::{Dataset, vulnerability};
use crate::trade::{TradeGraph, TradeGraphBuilder};

/// Convert a trade network into the canvas component's input.
fn to_graph_data(graph: &TradeGraph) -> GraphData {
	GraphData {
		nodes: graph
			.nodes
			.iter()
			.map(|n| GraphNode {
				id: n.code.clone(),
				label: Some(n.code.clone()),
				color: Some(n.color.to_string()),
				size: n.size,
				x: n.x,
				y: n.y,
			})
			.collect(),
		links: graph
			.edges
			.iter()
			.map(|e| GraphLink {
				source: graph.nodes[e.source].code.clone(),
				target: graph.nodes[e.target].code.clone(),
				weight: e.weight,
				width: e.width,
			})
			.collect(),
	}
}

/// Trade Networks page: the bilateral trade graph for a selected country
/// and year.
#[component]
pub fn Home() -> impl IntoView {
	match super::bundled_dataset() {
		Ok(dataset) => view! { <TradeNetworks dataset=Arc::new(dataset) /> }.into_any(),
		Err(err) => view! {
			<div class="load-error">
				<h1>"TREN – Trade & Resilience Explorer"</h1>
				<p>"Failed to load the dataset: " {err.to_string()}</p>
			</div>
		}
		.into_any(),
	}
}

#[component]
fn TradeNetworks(dataset: Arc<Dataset>) -> impl IntoView {
	let countries: Vec<String> = dataset
		.countries()
		.into_iter()
		.map(str::to_string)
		.collect();
	let initial = countries.first().cloned().unwrap_or_default();

	let (country, set_country) = signal(initial.clone());
	let (year, set_year) = signal(None::<i32>);
	let (top_n, set_top_n) = signal(10_usize);

	let ds = dataset.clone();
	let graph = Signal::derive(move || {
		match TradeGraphBuilder::new()
			.top_n(top_n.get())
			.build(&ds, &country.get(), year.get())
		{
			Ok(graph) => graph,
			Err(err) => {
				warn!("trade network rejected: {}", err);
				None
			}
		}
	});
	let graph_data = Signal::derive(move || {
		graph
			.with(|g| g.as_ref().map(to_graph_data))
			.unwrap_or_default()
	});

	let ds = dataset.clone();
	let years = Signal::derive(move || ds.years_for(&country.get()));
	let ds = dataset.clone();
	let vulnerabilities = Signal::derive(move || vulnerability::top_vulnerabilities(&ds, &country.get(), 3));

	let title = move || match graph.with(|g| g.as_ref().map(|g| (g.focal.clone(), g.year))) {
		Some((focal, year)) => format!("Top {} Trade Partners – {} ({})", top_n.get(), focal, year),
		None => format!("Trade Network – {}", country.get()),
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<ForceGraphCanvas data=graph_data fullscreen=true />
				<div class="graph-overlay">
					<h1>{title}</h1>
					<p class="subtitle">
						"Drag nodes to reposition. Scroll to zoom. Drag background to pan."
					</p>
					<div class="controls">
						<label>
							"Country "
							<select on:change=move |ev| {
								set_country.set(event_target_value(&ev));
								set_year.set(None);
							}>
								{countries
									.iter()
									.map(|c| {
										let selected = *c == initial;
										view! {
											<option value=c.clone() selected=selected>{c.clone()}</option>
										}
									})
									.collect_view()}
							</select>
						</label>
						<label>
							"Year "
							<select on:change=move |ev| {
								set_year.set(event_target_value(&ev).parse::<i32>().ok());
							}>
								<option value="latest">"Latest"</option>
								{move || {
									years
										.get()
										.into_iter()
										.map(|y| {
											let y = y.to_string();
											view! { <option value=y.clone()>{y.clone()}</option> }
										})
										.collect_view()
								}}
							</select>
						</label>
						<label>
							"Partners "
							<select on:change=move |ev| {
								if let Ok(n) = event_target_value(&ev).parse::<usize>() {
									set_top_n.set(n);
								}
							}>
								<option value="5">"5"</option>
								<option value="10" selected=true>"10"</option>
								<option value="15">"15"</option>
							</select>
						</label>
					</div>
					{move || {
						graph
							.with(Option::is_none)
							.then(|| {
								view! {
									<p class="warning">
										"No trade data available for this selection."
									</p>
								}
							})
					}}
					<div class="vuln-panel">
						<h2>"Top vulnerabilities"</h2>
						<ol>
							{move || {
								vulnerabilities
									.get()
									.into_iter()
									.map(|(name, score)| {
										view! { <li>{name} " – " {format!("{:.2}", score)}</li> }
									})
									.collect_view()
							}}
						</ol>
					</div>
					<a class="nav-link" href="/overview">"Dataset overview"</a>
				</div>
			</div>
		</ErrorBoundary>
	}
}
