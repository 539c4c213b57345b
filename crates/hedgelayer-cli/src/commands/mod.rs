pub mod assess;
pub mod auth;
pub mod hedge;
pub mod markets;
pub mod profile;

use hedgelayer_client::HedgeBundle;
use serde_json::Value;

use crate::output;

/// Render a bundle delivered as raw JSON from the stream parser.
pub(crate) fn display_bundle_value(value: &Value, json_mode: bool) {
    if json_mode {
        output::json(value);
        return;
    }
    match serde_json::from_value::<HedgeBundle>(value.clone()) {
        Ok(bundle) => display_bundle(&bundle),
        Err(_) => {
            output::warn("Bundle has an unexpected shape; showing raw JSON.");
            output::json(value);
        }
    }
}

pub(crate) fn display_bundle(bundle: &HedgeBundle) {
    output::heading("Hedge Bundle");

    output::table(
        &[
            vec!["Asset Value".into(), output::currency(bundle.asset_value)],
            vec!["Total Cost".into(), output::currency(bundle.total_cost)],
            vec![
                "Total Coverage".into(),
                output::currency(bundle.total_coverage),
            ],
            vec![
                "Efficiency".into(),
                output::percent(bundle.hedge_efficiency),
            ],
        ],
        None,
    );

    if !bundle.positions.is_empty() {
        println!("\n{}\n", output::bold("  Positions"));
        let rows: Vec<Vec<String>> = bundle
            .positions
            .iter()
            .map(|p| {
                let capped = if p.was_capped {
                    output::yellow(" (capped)")
                } else {
                    String::new()
                };
                vec![
                    output::truncate(&p.market.question, 40),
                    format!("{:.2}", p.yes_price),
                    output::currency(p.estimated_cost),
                    format!("{}{capped}", output::currency(p.potential_payout)),
                ]
            })
            .collect();
        output::table(&rows, Some(&["Market", "YES", "Cost", "Payout"]));
    }
}
