use std::path::PathBuf;

use common::types::SessionStatus;

use crate::handlers::Desk;

pub struct CommandInfo {
    pub name: &'static str,
    pub desc: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "open",
        desc: "Open a chat session",
        usage: "open <session_id>",
    },
    CommandInfo {
        name: "close",
        desc: "Close the session view",
        usage: "close",
    },
    CommandInfo {
        name: "file",
        desc: "Send a file to the open session (no path retries the last failed upload)",
        usage: "file [path]",
    },
    CommandInfo {
        name: "product",
        desc: "Open the product search panel",
        usage: "product",
    },
    CommandInfo {
        name: "search",
        desc: "Search products to link",
        usage: "search <term>",
    },
    CommandInfo {
        name: "pick",
        desc: "Send the n-th product of the search results",
        usage: "pick <n>",
    },
    CommandInfo {
        name: "status",
        desc: "Change the open session's status",
        usage: "status <pending|active|closed>",
    },
    CommandInfo {
        name: "assign",
        desc: "Assign the open session to yourself",
        usage: "assign",
    },
    CommandInfo {
        name: "refresh",
        desc: "Reload messages and the dashboard now",
        usage: "refresh",
    },
    CommandInfo {
        name: "help",
        desc: "List available commands",
        usage: "help",
    },
];

pub fn command_info(name: &str) -> Option<&'static CommandInfo> {
    COMMANDS.iter().find(|info| info.name == name)
}

fn usage_error(desk: &Desk, name: &str) {
    if let Some(info) = command_info(name) {
        desk.ctx.notifier.error(format!("Usage: {}", info.usage));
    }
}

/// Runs one `:` command line against the console.
pub async fn process_command(desk: &Desk, cmd: &str) {
    let parts: Vec<&str> = cmd.split_whitespace().collect();
    let Some((&name, args)) = parts.split_first() else {
        return;
    };
    let rest = args.join(" ");

    if args.first() == Some(&"-h") {
        match command_info(name) {
            Some(info) => desk
                .ctx
                .notifier
                .info(format!("{}: {} ({})", info.name, info.desc, info.usage)),
            None => desk.ctx.notifier.error("Unknown command"),
        }
        return;
    }

    match name {
        "help" => {
            let names: Vec<&str> = COMMANDS.iter().map(|info| info.name).collect();
            desk.ctx
                .notifier
                .info(format!("Available commands: {}, q", names.join(", ")));
        }
        "open" => match args.first() {
            Some(id) => {
                desk.open_session(id).await;
            }
            None => usage_error(desk, name),
        },
        "close" => {
            if !desk.close_session().await {
                desk.ctx.notifier.error("No session is open");
            }
        }
        "file" => {
            let path = (!rest.is_empty()).then(|| PathBuf::from(&rest));
            desk.send_file(path).await;
        }
        "product" => {
            desk.open_products().await;
        }
        "search" => {
            if rest.is_empty() {
                usage_error(desk, name);
                return;
            }
            let panel_open = desk.state.lock().await.products.visible;
            if panel_open || desk.open_products().await {
                desk.search_products(&rest).await;
            }
        }
        "pick" => match args.first().and_then(|n| n.parse::<usize>().ok()) {
            Some(n) if n > 0 => {
                desk.select_product(Some(n - 1)).await;
            }
            _ => usage_error(desk, name),
        },
        "status" => match args.first() {
            Some(status) => {
                let status = SessionStatus::from(status.to_string());
                desk.update_status(status).await;
            }
            None => usage_error(desk, name),
        },
        "assign" => {
            desk.assign().await;
        }
        "refresh" => {
            let open = desk.state.lock().await.detail.is_some();
            if open {
                desk.load_messages().await;
            }
            desk.refresh_dashboard().await;
        }
        other => desk.ctx.notifier.error(format!("Unknown command: {other}")),
    }
}
