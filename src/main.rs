use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};

use hiro_assist::assistant::{Assistant, NotificationLevel, WidgetEvent};
use hiro_assist::chat::{MessageKind, Sender};
use hiro_assist::cli::{CliCommand, CliParser};
use hiro_assist::config::AssistantConfig;
use hiro_assist::pipeline::UserRole;
use hiro_assist::services::Attachment;

const HELP: &str = "\
Commands:
  /open /close /min /toggle   change widget state
  /voice                      start or cancel voice capture
  /attach <file> [bytes]      attach a file
  /action <key>               run a quick action
  /menu                       list quick actions for the current role
  /role <jobseeker|recruiter> switch role context
  /rate <index> <up|down>     rate a message
  /push <text>                simulate an assistant notification
  /state                      print widget state
  /quit                       exit
Anything else is sent to the assistant.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AssistantConfig::from_env()?;
    let role: UserRole = std::env::var("HIRO_ROLE")
        .ok()
        .and_then(|r| r.parse().ok())
        .unwrap_or_default();

    eprintln!("💬 {} v{}", config.assistant_name, env!("CARGO_PKG_VERSION"));
    eprintln!("   Role: {}", role);
    eprintln!("   Type /help for commands, /open to start.\n");

    let assistant = Assistant::builder(config).role(role).build().await?;

    // ── Render events as they arrive ────────────────────────────────────
    let mut events = assistant.events();
    let renderer = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            match event {
                Ok(event) => render(event),
                Err(e) => tracing::warn!("Event stream lagged: {}", e),
            }
        }
    });

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let result = match CliParser::parse(&line) {
            CliCommand::Quit => break,
            CliCommand::Help => {
                eprintln!("{HELP}");
                Ok(())
            }
            CliCommand::Invalid { reason } => {
                eprintln!("⚠️  {}", reason);
                Ok(())
            }
            CliCommand::Submit { text } => assistant.submit_text(&text).await.map(|_| ()),
            CliCommand::Open => assistant.open().await.map(|_| ()),
            CliCommand::Close => assistant.close().await.map(|_| ()),
            CliCommand::Minimize => assistant.minimize().await.map(|_| ()),
            CliCommand::Toggle => assistant.toggle().await.map(|_| ()),
            CliCommand::Voice => assistant.toggle_voice().await.map(|_| ()),
            CliCommand::Attach {
                file_name,
                size_bytes,
            } => assistant
                .attach_file(Attachment::new(file_name, size_bytes))
                .await
                .map(|_| ()),
            CliCommand::Action { key } => assistant.select_quick_action(&key).await.map(|_| ()),
            CliCommand::Menu => {
                for action in assistant.quick_actions().await {
                    eprintln!("  {} {:<22} /action {}", action.icon, action.label, action.key);
                }
                Ok(())
            }
            CliCommand::Role { role } => assistant.set_role(role).await,
            CliCommand::Rate { index, rating } => {
                let snapshot = assistant.snapshot().await;
                match snapshot.messages.get(index) {
                    Some(message) => assistant.rate(message.id, rating).await.map(|_| ()),
                    None => {
                        eprintln!("⚠️  No message #{}", index);
                        Ok(())
                    }
                }
            }
            CliCommand::Push { text } => assistant.push_assistant_message(text).await.map(|_| ()),
            CliCommand::State => {
                let snapshot = assistant.snapshot().await;
                eprintln!(
                    "ℹ️  state={} messages={} typing={} listening={} unread={} draft={:?}",
                    snapshot.state,
                    snapshot.messages.len(),
                    snapshot.is_typing,
                    snapshot.is_listening,
                    snapshot.unread_count,
                    snapshot.draft,
                );
                Ok(())
            }
        };

        if let Err(e) = result {
            eprintln!("❌ {}", e);
        }
    }

    assistant.unmount().await;
    renderer.abort();
    Ok(())
}

fn render(event: WidgetEvent) {
    match event {
        WidgetEvent::MessageAppended { message } => {
            let who = match message.sender {
                Sender::User => "you",
                Sender::Assistant => "hiro",
            };
            println!("\n[#{} {} {}] {}", message.seq, message.display_time(), who, message.content);
            if message.kind == MessageKind::Card {
                if let Some(card) = message.card() {
                    println!("  ┌ {}", card.title);
                    println!("  │ {}", card.description);
                    for action in &card.actions {
                        println!("  │ [{}] /action {}", action.label, action.action);
                    }
                    println!("  └");
                }
            }
        }
        WidgetEvent::StateChanged { from, to } => eprintln!("🪟 {} → {}", from, to),
        WidgetEvent::TypingChanged { typing: true } => eprintln!("⏳ typing..."),
        WidgetEvent::ListeningChanged { listening } => {
            if listening {
                eprintln!("🎙️  listening...");
            } else {
                eprintln!("🎙️  stopped");
            }
        }
        WidgetEvent::DraftChanged { draft } if !draft.is_empty() => {
            eprintln!("✏️  heard: {}", draft)
        }
        WidgetEvent::UnreadChanged { count } if count > 0 => eprintln!("🔴 unread: {}", count),
        WidgetEvent::Notification { notification } => {
            let icon = match notification.level {
                NotificationLevel::Info => "🔔",
                NotificationLevel::Success => "✅",
                NotificationLevel::Warning => "⚠️ ",
            };
            eprintln!("{} {}", icon, notification.message);
        }
        _ => {}
    }
}
