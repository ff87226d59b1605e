// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `beacon contact add` and `beacon contact list`.

use beacon_config::model::BeaconConfig;
use beacon_core::{BeaconError, Contact};
use colored::Colorize;

use crate::app;

pub fn run_add(
    config: &BeaconConfig,
    name: &str,
    phone: &str,
    priority: u32,
    color: bool,
) -> Result<i32, BeaconError> {
    let store = app::open_store(config);
    let contact = store.add_contact(name, phone, priority)?;
    println!(
        "{} added {} {} (priority {})",
        app::ok_tag(color),
        contact.name,
        contact.phone,
        contact.priority
    );
    Ok(0)
}

pub fn run_list(config: &BeaconConfig, color: bool) -> Result<i32, BeaconError> {
    let store = app::open_store(config);
    let contacts = store.list_contacts()?;
    if contacts.is_empty() {
        println!("No active contacts. Add one with `beacon contact add <name> <phone>`.");
        return Ok(0);
    }
    for (index, contact) in contacts.iter().enumerate() {
        let line = format_contact(contact);
        if color && index == 0 {
            println!("{} {}", line, "(primary)".cyan());
        } else if index == 0 {
            println!("{line} (primary)");
        } else {
            println!("{line}");
        }
    }
    Ok(0)
}

fn format_contact(contact: &Contact) -> String {
    format!(
        "{:>3}  {:<24} {:<16} {}",
        contact.priority,
        contact.name,
        contact.phone.as_str(),
        contact.id
    )
}
