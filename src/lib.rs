#![doc = r#"
FESPRITE — a mask-driven map sprite compositor for the Fire Emblem 3DS titles.

Map sprites in Fire Emblem Fates and Echoes store head and body sprites on
separate sheets and carry their layering information in greyscale masks. This
crate slices those sheets into per-layer components, recombines head and body
according to each class's positional parameters, and writes assembled sheets
holding all four color variants plus a greyscale variant. It powers both the
FESPRITE CLI and GUI, and can be embedded in your own Rust applications.

Inputs
------
A root input directory (conventionally `inputs/`) holding prepared sheets
under `head/` and `body/`, plus the JSON data tables (`head.json`,
`body.json`, `head_offsets.json`, `body_offsets.json`, and optional
geometry overrides). Raw ripped sheets under `raw_head/`/`raw_body/` can be
turned into prepared sheets with [`api::prepare_directory`].

Add dependency
--------------
```toml
[dependencies]
fesprite = { version = "0.1", features = ["full"] }
```

Quick start: composite a pair to a file
---------------------------------------
```rust,no_run
use std::path::Path;
use fesprite::{composite_to_path, CompositeMode, CompositeParams};

fn main() -> fesprite::Result<()> {
    let params = CompositeParams {
        mode: CompositeMode::Full,
        alpha: true,
        offset: (0, 0),
        sidecar: true,
    };

    composite_to_path(
        Path::new("inputs"),
        "anna",
        "outlaw-f",
        &params,
        Path::new("outputs/anna_outlaw-f.png"),
    )
}
```

Composite in-memory to `ComposedSheet`
--------------------------------------
```rust,no_run
use std::path::Path;
use fesprite::{composite_to_buffer, CompositeParams};

fn main() -> fesprite::Result<()> {
    let sheet = composite_to_buffer(
        Path::new("inputs"),
        "anna",
        "outlaw-f",
        &CompositeParams::default(),
    )?;

    // Use the RGBA buffer in your pipeline and/or consult its metadata.
    println!("{}x{}", sheet.metadata.width, sheet.metadata.height);
    Ok(())
}
```

Batch helpers
-------------
```rust,no_run
use std::path::Path;
use fesprite::{composite_directory_to_path, CompositeParams};

fn main() -> fesprite::Result<()> {
    let report = composite_directory_to_path(
        Path::new("inputs"),
        "anna",
        Path::new("outputs"),
        &CompositeParams::default(),
        true, // continue_on_error
    )?;

    println!(
        "processed={} skipped={} errors={}",
        report.processed, report.skipped, report.errors
    );
    Ok(())
}
```

Error handling
--------------
All public functions return `fesprite::Result<T>`; match on `fesprite::Error`
to handle specific cases, e.g. missing sheets or malformed data tables.

```rust,no_run
use std::path::Path;
use fesprite::{composite_to_path, CompositeParams, Error};

fn main() {
    let params = CompositeParams::default();
    match composite_to_path(Path::new("inputs"), "anna", "bad", &params, Path::new("out.png")) {
        Ok(()) => {}
        Err(Error::UnknownBody { name }) => eprintln!("no such body: {name}"),
        Err(Error::Sheet(e)) => eprintln!("sheet error: {e}"),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Feature flags
-------------
- `gui`: builds the GUI crate module.
- `full`: enables a complete feature set for typical end-to-end workflows.

Useful modules
--------------
- [`api`] — high-level, ergonomic entry points.
- [`types`] — enums and core types (e.g. `ColorVariant`, `CompositeMode`).
- [`io`] — sheet loaders, JSON data tables, and writers.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// GUI module (only available with gui feature)
#[cfg(feature = "gui")]
pub mod gui;

// Curated public API surface
// Types
pub use core::params::CompositeParams;
pub use error::{Error, Result};
pub use types::{ColorVariant, CompositeMode, FacingState, HeadSize};

// Readers and tables
pub use io::data::{
    BodyOffsetTable, ColorOrder, CropSpec, DataError, FrameOffset, HeadOffsetTable, PathTable,
    SheetEntry, StateOffsets,
};
pub use io::sheets::{SheetError, SheetSource};

// Selected writer helpers (keep low-level metadata helpers public)
pub use io::writers::metadata::{SheetMetadata, create_sheet_metadata_sidecar};

// High-level API re-exports
pub use api::{
    BatchReport, ComposedSheet, composite_directory_to_path, composite_to_buffer,
    composite_to_path, iterate_body_classes, prepare_directory, save_sheet, scan_sheets,
};
