use leptos::prelude::*;
use trade_network_canvas::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
