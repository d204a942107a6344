// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Placeholder printed in place of a stored secret.
const MASK: &str = "****";

/// Mask a secret for display.
///
/// Broker passwords are short, so no character of them is shown. Only the
/// difference between set and unset survives.
pub fn mask_secret(value: &str) -> String {
    if value.is_empty() {
        "(none)".to_string()
    } else {
        MASK.to_string()
    }
}
