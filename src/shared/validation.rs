use lettre::message::Mailbox;

/// Entries of a comma-separated address list, trimmed, blanks dropped
pub fn split_addresses(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// A single mailbox: `user@host` or `Name <user@host>`
pub fn check_mailbox(address: &str) -> Result<(), String> {
    address
        .trim()
        .parse::<Mailbox>()
        .map(|_| ())
        .map_err(|_| format!("Invalid email address: {}", address.trim()))
}

/// Every entry of a comma-separated list must be a mailbox, and there must be one
pub fn check_mailbox_list(list: &str) -> Result<(), String> {
    let mut addresses = split_addresses(list).peekable();

    if addresses.peek().is_none() {
        return Err("At least one recipient is required".to_string());
    }

    addresses.try_for_each(check_mailbox)
}
