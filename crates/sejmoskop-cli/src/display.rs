//! Vertical card display for a bill's status and timeline.

use sejmoskop_core::{BillStatus, Event};

/// Print a bill as a human-readable card: header, status, then the
/// chronological event list.
pub fn print_bill_card(
    term: i64,
    number: &str,
    title: &str,
    status: BillStatus,
    events: &[Event],
) {
    println!("=== druk nr {} (kadencja {}) ===", number, term);
    if !title.is_empty() {
        println!("{}", title);
    }
    println!();
    println!("Status: {} ({})", status.label(), status.as_str());
    println!();

    if events.is_empty() {
        println!("(brak zarejestrowanych etapów)");
        return;
    }

    println!("Przebieg procesu:");
    for event in events {
        match &event.description {
            Some(desc) => println!("  {:<12} {} — {}", event.event_date, event.event_type, desc),
            None => println!("  {:<12} {}", event.event_date, event.event_type),
        }
    }
}
