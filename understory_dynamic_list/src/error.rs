// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Reasons a [`DynamicList`](crate::DynamicList) operation was refused.
///
/// A refused operation leaves the list untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListError {
    /// The list has not been prepared for display yet.
    NotPrepared,
    /// The list has been prepared and its configuration is frozen.
    AlreadyPrepared,
    /// The operation only applies to lists without sections.
    SectionsEnabled,
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::NotPrepared => "list has not been prepared for display",
            Self::AlreadyPrepared => "list configuration cannot change after preparation",
            Self::SectionsEnabled => "operation is not supported on lists with sections",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for ListError {}
