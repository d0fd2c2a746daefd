// Console Commands
//
// 行式交互界面：普通文本提交分析，冒号开头为命令。
// 会话变化通过事件总线回传并渲染。

use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

use super::render::{render_card, render_list, render_stats, HELP_TEXT};
use crate::modules::inbox::{ApplicationError, CategoryFilter, InboxDomainEvent, InboxModule};
use crate::shared::AppResult;

/// 控制台命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Submit(String),
    Retry,
    Filter(CategoryFilter),
    List,
    Stats,
    Reset,
    Help,
    Quit,
    /// 空行，忽略
    Empty,
}

impl FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(ConsoleCommand::Empty);
        }
        let Some(command) = trimmed.strip_prefix(':') else {
            return Ok(ConsoleCommand::Submit(line.to_string()));
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "filter" | "f" => {
                if arg.is_empty() {
                    return Err("Usage: :filter <All|Category>".to_string());
                }
                arg.parse().map(ConsoleCommand::Filter)
            }
            "list" | "l" => Ok(ConsoleCommand::List),
            "stats" | "s" => Ok(ConsoleCommand::Stats),
            "retry" | "r" => Ok(ConsoleCommand::Retry),
            "reset" => Ok(ConsoleCommand::Reset),
            "help" | "h" | "?" => Ok(ConsoleCommand::Help),
            "quit" | "q" | "exit" => Ok(ConsoleCommand::Quit),
            other => Err(format!("Unknown command: :{} (type :help)", other)),
        }
    }
}

/// 控制台会话
pub struct Console<'a, W> {
    inbox: &'a InboxModule,
    events: broadcast::Receiver<InboxDomainEvent>,
    out: W,
}

impl<'a, W> Console<'a, W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(inbox: &'a InboxModule, out: W) -> Self {
        Self {
            events: inbox.subscribe(),
            inbox,
            out,
        }
    }

    /// 逐行读取输入直到 :quit 或 EOF
    pub async fn run<R>(&mut self, input: R) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        self.write(HELP_TEXT).await?;
        self.prompt().await?;

        while let Some(line) = lines.next_line().await? {
            match line.parse::<ConsoleCommand>() {
                Ok(ConsoleCommand::Quit) => break,
                Ok(command) => self.execute(command).await?,
                Err(message) => self.write_line(&message).await?,
            }
            self.render_events().await?;
            self.prompt().await?;
        }

        self.out.flush().await?;
        Ok(())
    }

    /// 执行单条命令；会话变化的输出由事件驱动
    pub async fn execute(&mut self, command: ConsoleCommand) -> AppResult<()> {
        debug!("Console command: {:?}", command);

        match command {
            ConsoleCommand::Submit(text) => self.submit(text).await?,
            ConsoleCommand::Retry => {
                let draft = self.inbox.session().draft;
                if draft.trim().is_empty() {
                    self.write_line("Nothing to retry.").await?;
                } else {
                    self.submit(draft).await?;
                }
            }
            ConsoleCommand::Filter(filter) => {
                self.inbox.set_filter(filter).await?;
            }
            ConsoleCommand::List => {
                let listed = self.inbox.filtered_messages().await?;
                self.write(&render_list(&listed)).await?;
            }
            ConsoleCommand::Stats => {
                let stats = self.inbox.stats().await?;
                self.write(&render_stats(&stats)).await?;
            }
            ConsoleCommand::Reset => {
                self.inbox.reset().await?;
            }
            ConsoleCommand::Help => self.write(HELP_TEXT).await?,
            ConsoleCommand::Quit | ConsoleCommand::Empty => {}
        }
        Ok(())
    }

    async fn submit(&mut self, text: String) -> AppResult<()> {
        self.inbox.set_draft(text.clone());
        self.write_line("Analyzing...").await?;

        match self.inbox.submit(text).await {
            Ok(_) => {}
            // 失败提示由 AnalysisFailed 事件渲染
            Err(ApplicationError::AnalysisFailed { .. }) => {}
            Err(ApplicationError::ValidationError(_)) => {
                self.write_line("Please enter a message to analyze.").await?
            }
            Err(ApplicationError::Busy) => {
                self.write_line("Still analyzing the previous message.").await?
            }
            Err(ApplicationError::Superseded) => {}
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// 渲染自上次以来的所有会话事件
    async fn render_events(&mut self) -> AppResult<()> {
        loop {
            let event = match self.events.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Console lagged behind {} session events", skipped);
                    continue;
                }
            };

            match event {
                InboxDomainEvent::MessageAnalyzed(e) => {
                    let card = render_card(&e.message);
                    self.write(&card).await?;
                }
                InboxDomainEvent::AnalysisFailed(e) => self.write_line(&e.error).await?,
                InboxDomainEvent::FilterChanged(_) => {
                    let listed = self.inbox.filtered_messages().await?;
                    self.write(&render_list(&listed)).await?;
                }
                InboxDomainEvent::SessionReset(e) => {
                    let line = format!("Session cleared ({} messages removed).", e.removed_messages);
                    self.write_line(&line).await?;
                }
            }
        }
        Ok(())
    }

    async fn prompt(&mut self) -> AppResult<()> {
        self.write("> ").await?;
        self.out.flush().await?;
        Ok(())
    }

    async fn write(&mut self, text: &str) -> AppResult<()> {
        self.out.write_all(text.as_bytes()).await?;
        Ok(())
    }

    async fn write_line(&mut self, text: &str) -> AppResult<()> {
        self.write(text).await?;
        self.write("\n").await
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
