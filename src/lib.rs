/*!
# Smart Timetable

A personalized class-schedule lookup service for an academic institution,
built in Rust.

## Overview

Students are enrolled in course sections through per-course roster
spreadsheets; the institution publishes a weekly timetable grid whose
cells list course references in free text. Given a roll number, this
crate resolves the student's enrolled sections, finds every timetable
cell that references one of them, enriches the hits with faculty and
venue from the master course table, and produces a chronologically
ordered schedule that can be rendered interactively or exported to a
spreadsheet artifact.

## Architecture

One lookup flows through three stages:

- **Roster Resolver** - an enrollment index built from the roster
  directory maps roll numbers to course sections
- **Timetable Matcher** - compiled per-section patterns scan the grid
  cells, with separate rules for division-qualified (`CS101('A)`) and
  unqualified (`CS101`) references
- **Schedule Assembler** - deduplication, master-table enrichment,
  start-time extraction from free-text session labels, stable
  chronological ordering

All reference data is read through modification-time-checked caches, so
edited spreadsheets are picked up on the next request without a restart.

## Modules

- **course**: Course identifiers and master-table rows
- **roster**: Enrollment index over the roster directory
- **timetable**: Weekly grid rows and the cell-matching rules
- **schedule**: Schedule assembly, start-time extraction and ordering
- **loader**: Spreadsheet readers for the three reference datasets
- **cache**: Read-through file and directory caches with explicit
  invalidation hooks
- **lookup**: The per-request pipeline and its error taxonomy
- **downloader**: XLSX and CSV export of an assembled schedule
- **config**: Reference-data locations and startup validation
- **app**: Routing and handlers for the web shell (feature `web`)

## Binaries

- `smart-timetable` - terminal lookup: prints the schedule for one roll
  number and writes `<roll>_timetable.xlsx`
- `website` (feature `web`) - axum server with the interactive page, a
  JSON schedule endpoint, an XLSX download endpoint and a cache-reload
  endpoint
*/

pub mod cache;
pub mod config;
pub mod course;
pub mod downloader;
pub mod loader;
pub mod lookup;
pub mod roster;
pub mod schedule;
pub mod timetable;

#[cfg(feature = "web")]
pub mod app;

/// Re-export the lookup surface so callers can use the crate root
pub use course::*;
pub use lookup::*;
pub use roster::*;
pub use schedule::*;
pub use timetable::*;
