//! jurbot: interactive terminal chat with the advisory assistant
//!
//! Usage:
//!   jurbot [--service <name>] [--config <path>] [--demo]
//!
//! Plain lines are sent to the assistant; lines starting with `/` are commands
//! (see `/help`). While a reply or a payment is pending the prompt stays usable.

use anyhow::Context;
use futures::future::OptionFuture;
use jurbot::catalog::{find_service, CATALOG};
use jurbot::events::ConsoleEventSink;
use jurbot::export::export_latest;
use jurbot::pricing::format_amount;
use jurbot::session::{ExchangeOutcome, PaymentOutcome, TicketId};
use jurbot::{ChatConfig, ExportFormat, Message, MessageRole, Session, SessionBuilder};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinHandle};
use tracing_subscriber::EnvFilter;

struct Args {
    service: Option<String>,
    config: Option<PathBuf>,
    demo: bool,
}

/// A ticket running on its own task.
struct InFlight<T> {
    ticket: TicketId,
    handle: JoinHandle<T>,
}

/// Calls started from the prompt. The session admits at most one at a time.
#[derive(Default)]
struct Pending {
    exchange: Option<InFlight<ExchangeOutcome>>,
    payment: Option<InFlight<PaymentOutcome>>,
}

enum Input {
    Exchange(Result<ExchangeOutcome, JoinError>),
    Payment(Result<PaymentOutcome, JoinError>),
    Line(Option<String>),
}

fn print_usage() {
    println!(
        r#"jurbot — чат с финансово-юридическим помощником

USAGE:
    jurbot [OPTIONS]

OPTIONS:
    --service <name>    Услуга из каталога, выбранная перед входом в чат
    --config <path>     YAML-файл конфигурации
    --demo              Отвечать заготовленными ответами без обращения к AI
    -h, --help          Показать эту справку

ENVIRONMENT:
    JURBOT_EXCHANGE_URL, JURBOT_PAYMENT_URL, JURBOT_RETURN_URL,
    JURBOT_HTTP_TIMEOUT_SECS, JURBOT_PROXY_URL, JURBOT_DEMO, JURBOT_DEMO_DELAY_MS,
    RUST_LOG (default: jurbot=warn)"#
    );
}

fn print_commands() {
    println!(
        r#"Команды:
    /attach <path>              прикрепить файл
    /detach <n>                 убрать n-й прикреплённый файл
    /files                      показать прикреплённые файлы
    /pay                        оплатить последнее предложение
    /export <txt|md|json> [dir] сохранить последний ответ
    /history                    показать переписку
    /services                   показать каталог услуг
    /quit                       выйти"#
    );
}

fn parse_args(args: &[String]) -> anyhow::Result<Option<Args>> {
    let mut parsed = Args {
        service: None,
        config: None,
        demo: false,
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--service" => {
                parsed.service = Some(iter.next().context("--service needs a value")?.clone());
            }
            "--config" => {
                parsed.config = Some(PathBuf::from(
                    iter.next().context("--config needs a value")?,
                ));
            }
            "--demo" => parsed.demo = true,
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }
    Ok(Some(parsed))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jurbot=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_message(message: &Message) {
    let who = match message.role() {
        MessageRole::User => "Вы",
        MessageRole::Assistant => "ЮрБот",
    };
    println!("[{}] {}: {}", message.timestamp(), who, message.text());
    for a in message.attachments() {
        println!("    📎 {} ({})", a.name, a.size_label);
    }
    if let Some(p) = message.payment_proposal() {
        println!(
            "    💳 К оплате {} ₽ ({}). Введите /pay, чтобы оплатить.",
            format_amount(p.amount),
            p.description
        );
    }
}

fn print_pending(session: &Session) {
    if session.pending_attachments().is_empty() {
        println!("Нет прикреплённых файлов.");
        return;
    }
    for (i, a) in session.pending_attachments().iter().enumerate() {
        println!("  {}. {} ({})", i + 1, a.name, a.size_label());
    }
}

fn print_catalog() {
    for category in CATALOG {
        println!("{}:", category.title);
        for s in category.services {
            println!(
                "  • {} [{}; {}; {}] {}",
                s.name,
                s.complexity,
                s.volume,
                s.turnaround,
                s.price_label()
            );
        }
    }
}

/// Handle one input line. Returns `false` when the user asked to quit.
async fn handle_line(session: &mut Session, pending: &mut Pending, line: &str) -> anyhow::Result<bool> {
    let (command, rest) = match line.strip_prefix('/') {
        Some(cmd) => {
            let mut parts = cmd.splitn(2, char::is_whitespace);
            (
                Some(parts.next().unwrap_or("")),
                parts.next().unwrap_or("").trim(),
            )
        }
        None => (None, line),
    };

    let result: jurbot::Result<()> = match command {
        None => {
            if !session.state().is_idle() {
                println!("Подождите, предыдущий запрос ещё выполняется...");
                return Ok(true);
            }
            match session.begin_turn(rest) {
                Ok(Some(ticket)) => {
                    println!("ЮрБот печатает...");
                    pending.exchange = Some(InFlight {
                        ticket: ticket.id(),
                        handle: tokio::spawn(ticket.run()),
                    });
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(e) => Err(e),
            }
        }
        Some("quit") | Some("exit") => return Ok(false),
        Some("help") => {
            print_commands();
            Ok(())
        }
        Some("attach") if rest.is_empty() => {
            println!("Укажите путь к файлу: /attach <path>");
            Ok(())
        }
        Some("attach") => session.attach_file(rest).await.map(|_| print_pending(session)),
        Some("detach") => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => session.remove_attachment(n - 1).map(|removed| {
                println!("Убран файл {}", removed.name);
            }),
            _ => {
                println!("Укажите номер файла: /detach <n>");
                Ok(())
            }
        },
        Some("files") => {
            print_pending(session);
            Ok(())
        }
        Some("pay") => match session.latest_proposal().map(|(m, _)| m.id()) {
            Some(id) => session.begin_payment(id).map(|ticket| {
                println!("Создаю платёж...");
                pending.payment = Some(InFlight {
                    ticket: ticket.id(),
                    handle: tokio::spawn(ticket.run()),
                });
            }),
            None => {
                println!("Пока нет предложения к оплате.");
                Ok(())
            }
        },
        Some("export") => {
            let mut parts = rest.split_whitespace();
            match parts.next().map(str::parse::<ExportFormat>) {
                Some(Ok(format)) => {
                    let dir = parts.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
                    match export_latest(session.messages(), format) {
                        Ok(Some(artifact)) => artifact.save_to(&dir).map(|path| {
                            println!("Сохранено: {} ({})", path.display(), artifact.mime_type);
                        }),
                        Ok(None) => {
                            println!("Пока нечего экспортировать.");
                            Ok(())
                        }
                        Err(e) => Err(e),
                    }
                }
                Some(Err(e)) => Err(e),
                None => {
                    println!("Укажите формат: /export <txt|md|json> [dir]");
                    Ok(())
                }
            }
        }
        Some("history") => {
            session.messages().iter().for_each(print_message);
            Ok(())
        }
        Some("services") => {
            print_catalog();
            Ok(())
        }
        Some(other) => {
            println!("Неизвестная команда /{other}. Введите /help.");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Ошибка: {e}");
    }
    Ok(true)
}

/// Record a finished exchange task; a crashed task still frees the session.
fn settle_exchange(session: &mut Session, ticket: TicketId, joined: Result<ExchangeOutcome, JoinError>) {
    let settled = match joined {
        Ok(outcome) => session.finish_turn(outcome),
        Err(e) => {
            tracing::error!(%ticket, error = %e, "exchange task failed");
            session.abandon_turn(ticket)
        }
    };
    match settled {
        Ok(message) => print_message(message),
        Err(e) => eprintln!("Ошибка: {e}"),
    }
}

fn settle_payment(session: &mut Session, ticket: TicketId, joined: Result<PaymentOutcome, JoinError>) {
    let settled = match joined {
        Ok(outcome) => session.finish_payment(outcome),
        Err(e) => {
            tracing::error!(%ticket, error = %e, "payment task failed");
            session.abandon_payment(ticket)
        }
    };
    match settled {
        Ok(message) => print_message(message),
        Err(e) => eprintln!("Ошибка: {e}"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(Some(args)) => args,
        Ok(None) => return Ok(()),
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            std::process::exit(2);
        }
    };

    let mut config = ChatConfig::load(args.config.as_deref()).context("loading configuration")?;
    if args.demo {
        config.demo = true;
    }
    config.validate()?;

    if let Some(name) = &args.service {
        if find_service(name).is_none() {
            tracing::warn!(service = %name, "service is not in the catalog");
        }
    }

    let mut builder = SessionBuilder::new()
        .config(config)
        .event_sink(Arc::new(ConsoleEventSink::default()));
    if let Some(service) = args.service {
        builder = builder.service(service);
    }
    let mut session = builder.build()?;

    session.messages().iter().for_each(print_message);
    println!("(/help — список команд)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = Pending::default();

    loop {
        let input = tokio::select! {
            Some(joined) = OptionFuture::from(pending.exchange.as_mut().map(|c| &mut c.handle)) => {
                Input::Exchange(joined)
            }
            Some(joined) = OptionFuture::from(pending.payment.as_mut().map(|c| &mut c.handle)) => {
                Input::Payment(joined)
            }
            line = lines.next_line() => Input::Line(line?),
        };

        match input {
            Input::Exchange(joined) => {
                if let Some(call) = pending.exchange.take() {
                    settle_exchange(&mut session, call.ticket, joined);
                }
            }
            Input::Payment(joined) => {
                if let Some(call) = pending.payment.take() {
                    settle_payment(&mut session, call.ticket, joined);
                }
            }
            Input::Line(Some(line)) => {
                if !handle_line(&mut session, &mut pending, line.trim_end()).await? {
                    break;
                }
            }
            Input::Line(None) => {
                if let Some(call) = pending.exchange.take() {
                    settle_exchange(&mut session, call.ticket, call.handle.await);
                }
                if let Some(call) = pending.payment.take() {
                    settle_payment(&mut session, call.ticket, call.handle.await);
                }
                break;
            }
        }
    }

    Ok(())
}
