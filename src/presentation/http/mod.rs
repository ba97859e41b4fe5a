pub mod asset_shell;
