use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use forms::{
    FormValues, Outcome, Remote, UserApi,
    pages::{login::login_form, signup::signup_form},
    pipeline::Form,
};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Base URL of a running server.
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Signup {
        name: String,
        email: String,
        password: String,
    },
    Login {
        email: String,
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let api = UserApi::new(args.url);

    match args.command {
        Command::Signup {
            name,
            email,
            password,
        } => {
            let form = signup_form(api);
            run(form, &[("name", name), ("email", email), ("password", password)]).await
        }
        Command::Login { email, password } => {
            let form = login_form(api);
            run(form, &[("email", email), ("password", password)]).await
        }
    }
}

async fn run<T, R>(mut form: Form<T, R>, fields: &[(&str, String)]) -> Result<()>
where
    T: FormValues,
    R: Remote<T>,
    R::Data: std::fmt::Debug,
{
    for (name, value) in fields {
        form.set_field(name, value.as_str())?;
        form.mark_touched(name)?;
    }

    match form.submit().await? {
        Outcome::Success { route, data } => {
            println!("Success, navigate to {route}");
            if let Some(data) = data {
                println!("{data:#?}");
            }
            Ok(())
        }
        Outcome::Invalid(errors) => {
            for (field, message) in errors.iter() {
                println!("{field}: {message}");
            }
            bail!("Form did not validate")
        }
        Outcome::Rejected(message) => bail!("Server rejected the form: {message}"),
        Outcome::Failed(error) => Err(error.into()),
        Outcome::Ignored | Outcome::Discarded => bail!("Submit did not settle"),
    }
}
