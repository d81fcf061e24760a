use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use fce_client::{
    api::{
        format_time_posted, Comment, Connectivity, ConnectivityProbe, CourseId, Identity, Reply,
        UserId,
    },
    parse::{ParseConfig, ParseStore},
    CommentStore, StoreConfig,
};

#[derive(structopt::StructOpt)]
struct Opt {
    #[structopt(short, long)]
    server_url: String,

    /// Act as this user. Without it, only reads are possible.
    #[structopt(short, long)]
    user: Option<String>,

    /// Time zone used to stamp new posts
    #[structopt(long, default_value = "America/New_York")]
    tz: String,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// List the comments of a course, with their replies
    List { course: String },

    /// Post a new comment
    Post {
        course: String,
        header: String,
        text: String,

        #[structopt(long)]
        anonymous: bool,
    },

    /// Replace the header and text of one of your comments
    Edit {
        course: String,

        /// Position of the comment, as shown by `list`
        index: usize,

        header: String,
        text: String,

        #[structopt(long)]
        anonymous: bool,
    },

    /// Reply to a comment
    Reply {
        course: String,
        index: usize,
        text: String,

        #[structopt(long)]
        anonymous: bool,
    },

    /// Delete one of your comments
    Delete { course: String, index: usize },
}

/// Considers the network up when the server answers HTTP at all, whatever the
/// status
struct HostProbe {
    client: reqwest::Client,
    url: String,
}

#[async_trait]
impl ConnectivityProbe for HostProbe {
    async fn current(&self) -> Connectivity {
        let res = self
            .client
            .head(&self.url)
            .timeout(Duration::from_secs(3))
            .send()
            .await;
        match res {
            Ok(_) => Connectivity::Connected,
            Err(err) => {
                tracing::debug!(url = %self.url, ?err, "server unreachable");
                Connectivity::Disconnected
            }
        }
    }
}

fn parse_config(server_url: String) -> anyhow::Result<ParseConfig> {
    Ok(ParseConfig {
        server_url,
        app_id: std::env::var("PARSE_APP_ID")
            .context("retrieving PARSE_APP_ID environment variable")?,
        rest_key: std::env::var("PARSE_REST_KEY")
            .context("retrieving PARSE_REST_KEY environment variable")?,
        session_token: std::env::var("PARSE_SESSION_TOKEN").ok(),
    })
}

fn print_comment(index: usize, c: &Comment) {
    println!("[{index}] {} ({}, {})", c.header, c.author_label(), c.time_posted);
    if !c.comment_text.is_empty() {
        println!("    {}", c.comment_text);
    }
    for r in &c.replies {
        println!("    > {} ({}, {})", r.reply_text, r.author_label(), r.time_posted);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    let tz: chrono_tz::Tz = opt
        .tz
        .parse()
        .map_err(|e| anyhow!("parsing time zone {:?}: {e}", opt.tz))?;
    let now = || format_time_posted(chrono::Utc::now(), &tz);
    let identity = match opt.user {
        Some(u) => Identity::User(UserId(u)),
        None => Identity::Guest,
    };
    let author = || {
        identity
            .user()
            .cloned()
            .ok_or_else(|| anyhow!("--user is required to write comments"))
    };

    let probe = HostProbe {
        client: reqwest::Client::new(),
        url: opt.server_url.clone(),
    };
    let remote = ParseStore::new(parse_config(opt.server_url)?);
    let mut store = CommentStore::new(remote, probe, StoreConfig::default());

    match opt.cmd {
        Command::List { course } => {
            let course = CourseId(course);
            let doc = store
                .load_comments(&course)
                .await
                .with_context(|| format!("loading comments of {course}"))?;
            if doc.comments.is_empty() {
                println!("No comments yet for {course}");
            }
            for (i, c) in doc.comments.iter().enumerate() {
                print_comment(i, c);
            }
        }
        Command::Post {
            course,
            header,
            text,
            anonymous,
        } => {
            let course = CourseId(course);
            let draft = Comment::draft(author()?, course.clone(), header, text, anonymous, now());
            store
                .post_comment(&identity, &course, draft)
                .await
                .with_context(|| format!("posting to {course}"))?;
        }
        Command::Edit {
            course,
            index,
            header,
            text,
            anonymous,
        } => {
            let course = CourseId(course);
            let doc = store
                .load_comments(&course)
                .await
                .with_context(|| format!("loading comments of {course}"))?;
            let current = doc
                .comments
                .get(index)
                .ok_or_else(|| anyhow!("{course} has no comment {index}"))?;
            let updated = current.edited(header, text, anonymous);
            store
                .edit_comment(&identity, &course, index, updated)
                .await
                .with_context(|| format!("editing comment {index} of {course}"))?;
        }
        Command::Reply {
            course,
            index,
            text,
            anonymous,
        } => {
            let course = CourseId(course);
            let reply = Reply::draft(author()?, text, anonymous, now());
            store
                .post_reply(&identity, &course, index, reply)
                .await
                .with_context(|| format!("replying to comment {index} of {course}"))?;
        }
        Command::Delete { course, index } => {
            let course = CourseId(course);
            store
                .delete_comment(&identity, &course, index)
                .await
                .with_context(|| format!("deleting comment {index} of {course}"))?;
        }
    }

    Ok(())
}
