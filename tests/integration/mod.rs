/// Integration tests against file-backed databases
mod store_workflow;
mod mcp_session;
