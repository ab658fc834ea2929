// Copyright 2026 the Packwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Indented dumps of element subtrees.

use std::io::{self, Write};

use packwork_core::{ElementId, ElementKind, ElementStore, SizeRange};

/// Writes `root` and its descendants in pre-order, one element per line,
/// indented by depth below `root`.
///
/// Each line shows the slot index, the pack mode (or `window`), the area, the
/// depth, and any non-default range or state:
///
/// ```text
/// #0 window (0,0 100x100) z=0
///   #1 top (0,0 100x10) z=1 h=..10
///   #2 main (0,10 100x90) z=1
/// ```
///
/// # Errors
///
/// Returns any error from `writer`.
pub fn write_tree<W: Write>(
    store: &ElementStore,
    root: ElementId,
    writer: &mut W,
) -> io::Result<()> {
    let base = store.z(root);
    for id in store.descendants(root) {
        let depth = store.z(id).saturating_sub(base) as usize;
        write_node(store, id, depth, writer)?;
    }
    Ok(())
}

/// Renders [`write_tree`] into a `String`.
#[must_use]
pub fn tree_string(store: &ElementStore, root: ElementId) -> String {
    let mut out = Vec::new();
    // Writing into a `Vec` cannot fail.
    let _ = write_tree(store, root, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}

fn write_node<W: Write>(
    store: &ElementStore,
    id: ElementId,
    depth: usize,
    writer: &mut W,
) -> io::Result<()> {
    let label = match store.kind(id) {
        ElementKind::Window => "window",
        ElementKind::Element => store.pack_mode(id).as_str(),
    };
    write!(
        writer,
        "{:indent$}#{} {label} {} z={}",
        "",
        id.index(),
        store.area(id),
        store.z(id),
        indent = depth * 2,
    )?;
    write_range(writer, "w", store.w_range(id))?;
    write_range(writer, "h", store.h_range(id))?;
    let flags = store.flags(id);
    if flags.hidden {
        write!(writer, " hidden")?;
    } else if flags.parent_hidden {
        write!(writer, " parent-hidden")?;
    }
    if store.is_pending(id) {
        write!(writer, " pending")?;
    }
    writeln!(writer)
}

fn write_range<W: Write>(writer: &mut W, name: &str, range: SizeRange) -> io::Result<()> {
    match (range.min, range.max) {
        (0, u32::MAX) => Ok(()),
        (min, u32::MAX) => write!(writer, " {name}={min}.."),
        (0, max) => write!(writer, " {name}=..{max}"),
        (min, max) => write!(writer, " {name}={min}..{max}"),
    }
}
