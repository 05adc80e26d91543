use std::path::Path;

/// Header block the workspace sources carried before the license migration.
pub const OLD_HEADER: &str = "\
// studio -- a browser-based creative coding workspace
// Copyright (C) 2024  The studio authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.";

/// Replacement header for the AGPL relicensing.
pub const NEW_HEADER: &str = "\
// studio -- a browser-based creative coding workspace
// Copyright (C) 2025  The studio authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.";

/// Replace every occurrence of the old header with the new one, in place.
///
/// A file without the old header is rewritten byte-identical, so a second
/// run over an already-migrated file is a no-op.
pub fn rewrite_header(path: &Path) -> anyhow::Result<()> {
    let src = std::fs::read_to_string(path)?;
    let dst = src.replace(OLD_HEADER, NEW_HEADER);
    std::fs::write(path, dst)?;
    Ok(())
}
