// Copyright 2025 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use serde::de::IgnoredAny;

/// Whether the payload is a syntactically valid JSON value, of any kind.
///
/// Nothing beyond the JSON grammar is checked.
#[must_use]
pub fn is_json(payload: &str) -> bool {
    serde_json::from_str::<IgnoredAny>(payload).is_ok()
}
