//! The per-connection session.
//!
//! A `Session` owns every channel and virtual user the client creates. All
//! membership changes go through the methods here so the channel's member
//! set and the user's channel set are always updated together. Outbound
//! messages are queued on `pending` and flushed by the connection after each
//! command or input event.

use super::channel::addressed;
use super::{Channel, VirtualUser, user_name};
use crate::config::Config;
use crate::error::{ChannelError, HandlerError, UserError};
use crate::input::{InputEvent, InputSource, LineSink};
use chrono::{DateTime, Utc};
use irclogd_proto::{format_reply, ChannelExt, Message, Response};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Server identity shared by every session.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    /// Hostname used as reply prefix and in every identity.
    pub name: String,
    pub version: String,
    pub created: DateTime<Utc>,
    pub motd: Vec<String>,
}

impl ServerInfo {
    pub fn from_config(config: &Config) -> Self {
        Self {
            name: config.server.name.clone(),
            version: format!("irclogd-{}", env!("CARGO_PKG_VERSION")),
            created: Utc::now(),
            motd: config.motd.lines.clone(),
        }
    }
}

/// Connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport open, NICK and USER not both seen yet.
    Connected,
    Registered,
    /// Terminal; everything the session owned has been torn down.
    Closed,
}

/// State of one client connection.
pub struct Session {
    info: Arc<ServerInfo>,
    pub nick: Option<String>,
    pub user: Option<String>,
    pub realname: Option<String>,
    pub state: SessionState,
    pub channels: HashMap<String, Channel>,
    pub users: HashMap<String, VirtualUser>,
    pending: Vec<Message>,
    events: mpsc::Sender<InputEvent>,
    next_generation: u64,
    /// Aborted input tasks whose sockets or pipes are not yet released.
    stopping: Vec<JoinHandle<()>>,
}

impl Session {
    pub fn new(info: Arc<ServerInfo>, events: mpsc::Sender<InputEvent>) -> Self {
        Self {
            info,
            nick: None,
            user: None,
            realname: None,
            state: SessionState::Connected,
            channels: HashMap::new(),
            users: HashMap::new(),
            pending: Vec::new(),
            events,
            next_generation: 0,
            stopping: Vec::new(),
        }
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    pub fn host(&self) -> &str {
        &self.info.name
    }

    /// The client's nick, or `*` before NICK.
    pub fn nick(&self) -> &str {
        self.nick.as_deref().unwrap_or("*")
    }

    /// `nick!user@host` for the connected client.
    pub fn client_identity(&self) -> String {
        let nick = self.nick();
        let user = self.user.as_deref().unwrap_or(nick);
        format!("{}!{}@{}", nick, user, self.host())
    }

    pub fn is_registered(&self) -> bool {
        self.state == SessionState::Registered
    }

    // ------------------------------------------------------------------------
    // Outbound queue
    // ------------------------------------------------------------------------

    /// Queue a reply from the server addressed to the client's nick.
    pub fn reply<C, I, S>(&mut self, command: C, params: I)
    where
        C: ToString,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let msg = format_reply(command, self.host(), self.nick(), None, params);
        self.pending.push(msg);
    }

    /// Queue a message sent by `from` instead of the server.
    pub fn send_as<C, I, S>(&mut self, from: &str, command: C, params: I)
    where
        C: ToString,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let msg = format_reply(command, self.host(), self.nick(), Some(from), params);
        self.pending.push(msg);
    }

    pub fn push(&mut self, msg: Message) {
        self.pending.push(msg);
    }

    pub fn extend(&mut self, msgs: impl IntoIterator<Item = Message>) {
        self.pending.extend(msgs);
    }

    /// A NOTICE from the server into `channel`.
    pub fn server_notice(&mut self, channel: &str, text: &str) {
        let host = self.host().to_string();
        self.send_as(&host, "NOTICE", [channel, text]);
    }

    /// Drain everything queued so far.
    pub fn take_pending(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.pending)
    }

    // ------------------------------------------------------------------------
    // Channels
    // ------------------------------------------------------------------------

    /// Create and join `name`. Joining a channel that already exists does
    /// nothing.
    pub fn join_channel(&mut self, name: &str) -> Result<(), HandlerError> {
        if !name.is_channel_name() {
            return Err(HandlerError::NoSuchChannel(name.to_string()));
        }
        if self.channels.contains_key(name) {
            debug!(channel = %name, "Already joined");
            return Ok(());
        }

        let channel = Channel::new(name);
        let identity = self.client_identity();
        self.send_as(&identity, "JOIN", [name]);
        let host = self.host().to_string();
        let nick = self.nick().to_string();
        self.push(channel.topic_reply(&host, &nick));
        self.extend(channel.names_replies(&host, &nick));
        self.channels.insert(name.to_string(), channel);
        info!(channel = %name, "Channel created");
        Ok(())
    }

    /// Tear down `name`: every member leaves, then the client parts and the
    /// channel is removed.
    pub fn part_channel(&mut self, name: &str) -> Result<(), HandlerError> {
        let members: Vec<String> = match self.channels.get(name) {
            Some(channel) if name.is_channel_name() => channel.members.iter().cloned().collect(),
            _ => return Err(HandlerError::NoSuchChannel(name.to_string())),
        };

        for member in members {
            self.leave(&member, name, None);
        }

        let identity = self.client_identity();
        self.send_as(&identity, "PART", [name, ""]);
        self.channels.remove(name);
        info!(channel = %name, "Channel removed");
        Ok(())
    }

    /// Invite the user named by `ident` into `channel`, creating it first if
    /// needed.
    pub fn invite_user(&mut self, ident: &str, channel: &str) -> Result<(), HandlerError> {
        if user_name(ident).is_empty() {
            return Err(HandlerError::NeedMoreParams("INVITE".to_string()));
        }
        let chan = self
            .channels
            .get_mut(channel)
            .ok_or_else(|| HandlerError::NoSuchChannel(channel.to_string()))?;

        let candidate = VirtualUser::new(ident);
        let name = candidate.name.clone();
        if chan.is_member(&name) {
            return Err(HandlerError::UserOnChannel {
                user: name,
                channel: channel.to_string(),
            });
        }
        chan.members.insert(name.clone());

        let user = self.users.entry(name.clone()).or_insert_with(|| {
            info!(user = %candidate.name, "Virtual user created");
            candidate
        });
        user.channels.insert(channel.to_string());
        let identity = user.identity(&self.info.name);

        self.send_as(&identity, "JOIN", [channel]);
        self.reply(Response::RPL_INVITING, [name.as_str(), channel]);
        Ok(())
    }

    /// Remove `user` from `channel` on the client's behalf.
    pub fn kick_user(&mut self, channel: &str, user: &str, reason: &str) -> Result<(), HandlerError> {
        let chan = self
            .channels
            .get(channel)
            .ok_or_else(|| HandlerError::NoSuchChannel(channel.to_string()))?;
        if !chan.is_member(user) {
            return Err(HandlerError::NotOnChannel(channel.to_string()));
        }
        self.leave(user, channel, Some(reason));
        Ok(())
    }

    /// Remove `user` from `channel`, announcing a PART or, with a reason, a
    /// KICK. A user left without channels is destroyed. Does nothing if the
    /// user is not a member.
    pub fn leave(&mut self, user: &str, channel: &str, kick: Option<&str>) {
        let Some(vuser) = self.users.get_mut(user) else {
            return;
        };
        if !vuser.channels.remove(channel) {
            return;
        }
        if let Some(chan) = self.channels.get_mut(channel) {
            chan.members.remove(user);
        }

        let now_empty = vuser.channels.is_empty();
        let identity = vuser.identity(&self.info.name);
        match kick {
            Some(reason) => {
                let client = self.client_identity();
                self.send_as(&client, "KICK", [channel, user, reason]);
            }
            None => self.send_as(&identity, "PART", [channel, ""]),
        }

        if now_empty {
            self.destroy_user(user);
        }
    }

    /// Drop `user` from the registry, stopping its input.
    pub fn destroy_user(&mut self, user: &str) {
        let Some(mut vuser) = self.users.remove(user) else {
            return;
        };
        for channel in &vuser.channels {
            if let Some(chan) = self.channels.get_mut(channel) {
                chan.members.remove(user);
            }
        }
        if let Some(mut input) = vuser.input.take() {
            self.stopping.extend(input.stop().task);
        }
        info!(user = %user, "Virtual user destroyed");
    }

    /// Make `user` leave every channel it is in.
    pub fn user_die(&mut self, user: &str) {
        let channels: Vec<String> = match self.users.get(user) {
            Some(vuser) => vuser.channels.iter().cloned().collect(),
            None => return,
        };
        for channel in channels {
            self.leave(user, &channel, None);
        }
    }

    /// Handle text the client typed into `channel`.
    pub fn channel_command(&mut self, channel: &str, text: &str) {
        if let Some((user, rest)) = addressed(text) {
            if self.users.contains_key(user) {
                self.user_command(user, rest, Some(channel));
            } else {
                let err = ChannelError::NoSuchUser(user.to_string());
                self.server_notice(channel, &err.to_string());
            }
            return;
        }

        let command = text.split_whitespace().next().unwrap_or("");
        let lines = self
            .channels
            .get(channel)
            .and_then(|chan| chan.local_command(command));
        for line in lines.into_iter().flatten() {
            self.server_notice(channel, &line);
        }
    }

    // ------------------------------------------------------------------------
    // Virtual users
    // ------------------------------------------------------------------------

    /// Send `text` from `user` as `command` (PRIVMSG or NOTICE), into
    /// `channel` or, without one, into every channel the user is in.
    pub fn user_send(
        &mut self,
        user: &str,
        command: &str,
        text: &str,
        channel: Option<&str>,
    ) -> Result<(), UserError> {
        let Some(vuser) = self.users.get(user) else {
            return Ok(());
        };
        let identity = vuser.identity(&self.info.name);
        let targets: Vec<String> = match channel {
            Some(chan) if vuser.channels.contains(chan) => vec![chan.to_string()],
            Some(chan) => {
                return Err(UserError::Consistency {
                    user: user.to_string(),
                    channel: chan.to_string(),
                });
            }
            None => vuser.channels.iter().cloned().collect(),
        };

        for target in targets {
            self.send_as(&identity, command, [target.as_str(), text]);
        }
        Ok(())
    }

    /// Notice from `user` into `origin`, or every channel of the user.
    pub fn user_reply(&mut self, user: &str, text: &str, origin: Option<&str>) {
        if let Err(err) = self.user_send(user, "NOTICE", text, origin) {
            warn!(user = %user, channel = ?origin, error = %err, "Reply to a channel the user is not in");
            if let Some(channel) = origin {
                self.server_notice(channel, &err.to_string());
            }
        }
    }

    pub fn has_input(&self, user: &str) -> bool {
        self.users.get(user).is_some_and(|u| u.input.is_some())
    }

    /// Construct and start a `kind` input for `user`. The start notices go to
    /// every channel the user is in.
    pub fn bind_input(&mut self, user: &str, kind: &str, args: &[&str]) -> Result<(), UserError> {
        let Some(vuser) = self.users.get_mut(user) else {
            return Ok(());
        };
        if vuser.input.is_some() {
            return Err(UserError::AlreadyBound);
        }
        let construct =
            InputSource::constructor(kind).ok_or_else(|| UserError::UnknownKind(kind.to_string()))?;
        let mut source = construct(args)?;

        self.next_generation += 1;
        let generation = self.next_generation;
        let sink = LineSink::new(user, generation, self.events.clone());
        let notices = source.start(sink);
        vuser.input = Some(source);
        vuser.generation = generation;
        info!(user = %user, kind = %kind, generation, "Input bound");

        for notice in notices {
            self.user_send(user, "NOTICE", &notice, None)?;
        }
        Ok(())
    }

    /// Stop and release the input of `user`.
    pub fn reset_input(&mut self, user: &str) -> Result<(), UserError> {
        let mut input = self
            .users
            .get_mut(user)
            .and_then(|u| u.input.take())
            .ok_or(UserError::NoInputBound)?;
        let stopped = input.stop();
        drop(input);
        self.stopping.extend(stopped.task);
        self.user_send(user, "NOTICE", &stopped.notice, None)
    }

    /// Wait for every aborted input task to finish, releasing the sockets
    /// and pipes they held. Called before the next command or input line is
    /// handled, so a port freed by `reset` can be bound again at once.
    pub async fn release_stopped(&mut self) {
        for task in std::mem::take(&mut self.stopping) {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    warn!(error = %e, "Input task failed");
                }
            }
        }
    }

    /// Relay a line from an input task, unless its source has since been
    /// reset or its user destroyed.
    pub fn handle_input_event(&mut self, event: InputEvent) {
        let current = self
            .users
            .get(&event.user)
            .is_some_and(|u| u.owns_generation(event.generation));
        if !current {
            debug!(user = %event.user, generation = event.generation, "Dropping stale input line");
            return;
        }
        if let Err(err) = self.user_send(&event.user, "PRIVMSG", &event.line, None) {
            warn!(error = %err, "Failed to relay input line");
        }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// RPL_WHOREPLY lines for `mask`: the client itself, a channel's members,
    /// or a single virtual user. Unknown masks produce nothing.
    pub fn who(&mut self, mask: &str) {
        let host = self.host().to_string();
        let nick = self.nick().to_string();

        let replies: Vec<Message> = if mask.eq_ignore_ascii_case(&nick) {
            let user = self.user.clone().unwrap_or_else(|| nick.clone());
            let realname = self.realname.clone().unwrap_or_else(|| nick.clone());
            let gecos = format!("0 {realname}");
            let first = self.channels.keys().min().cloned().unwrap_or_else(|| "*".into());
            vec![format_reply(
                Response::RPL_WHOREPLY,
                &host,
                &nick,
                None,
                [
                    first.as_str(),
                    user.as_str(),
                    host.as_str(),
                    host.as_str(),
                    nick.as_str(),
                    "H",
                    gecos.as_str(),
                ],
            )]
        } else if let Some(channel) = self.channels.get(mask) {
            channel
                .members
                .iter()
                .filter_map(|m| self.users.get(m))
                .map(|u| u.who_reply(&host, &nick, Some(mask)))
                .collect()
        } else if let Some(user) = self.users.get(mask) {
            vec![user.who_reply(&host, &nick, None)]
        } else {
            debug!(mask = %mask, "WHO matched nothing");
            return;
        };

        self.extend(replies);
        self.reply(Response::RPL_ENDOFWHO, [mask, "End of /WHO list"]);
    }

    /// Tear down everything the session owns.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        let users: Vec<String> = self.users.keys().cloned().collect();
        for user in users {
            self.destroy_user(&user);
        }
        self.channels.clear();
        self.state = SessionState::Closed;
        info!(nick = %self.nick(), "Session closed");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
