/*!
# Sitedash

A browser-based dashboard for website/backlink data sourced from a Google
Sheet, built in Rust.

## Overview

The application proxies a fixed range of a Google spreadsheet through a small
axum server and renders it as a filterable, sortable, paginated table behind a
cookie-presence gate. The spreadsheet is the sole source of truth: nothing is
persisted, every fetch recreates the records, and a 300-second revalidate
window is the only caching.

## Architecture

- **Sheets gateway** - calls the Sheets v4 values API with an API key from the
  environment, maps each row positionally into a nine-field record, and serves
  the array at `/api/sheets`. Upstream failures are logged server-side and
  reported to clients with a fixed message.
- **Table view** - pure view derivation over the record array: a
  case-insensitive domain filter, a stable per-column typed sort, and pages of
  ten rows. The column set is a statically declared ordered list.
- **Access gate** - middleware on `/dashboard` that checks for the presence of
  an `auth` cookie and redirects to the landing page otherwise. The value is
  never validated; this is cosmetic access control, not security.

## Modules

- **sheets**: record normalization, the Sheets API client, error taxonomy,
  and the revalidate cache
- **table**: column schema, filtering, sorting, and pagination
- **auth**: the cookie gate plus the enter/logout handlers
- **app**: routing, shared state, and server-side page rendering
- **config**: environment configuration
*/

pub mod app;
pub mod auth;
pub mod config;
pub mod sheets;
pub mod table;
