// One inherent `impl ApiClient` block per API area.

mod auth;
mod copilot;
mod dashboard;
mod machines;
mod recommendations;
mod schedules;
mod telemetry;
mod users;
