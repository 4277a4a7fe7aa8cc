use anyhow::Context;
use control::{Control, Either, Presence, Try, Validation};
use log::info;
use std::collections::HashMap;

#[derive(Debug)]
struct Account {
    owner: String,
    age: u32,
}

fn lookup<'a>(settings: &HashMap<&str, &'a str>, key: &str) -> Presence<&'a str> {
    settings.get(key).copied().into()
}

fn parse_age(raw: &str) -> Try<u32> {
    Try::of(|| raw.parse::<u32>().with_context(|| format!("age {:?}", raw)))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = HashMap::from([("owner", "John Doe"), ("age", "39")]);

    let greeting = Presence::direct(|s| {
        let owner = s.extract(lookup(&settings, "owner"))?;
        let age = s.extract(lookup(&settings, "age"))?;
        Ok(format!("{} ({})", owner, age))
    });
    info!("greeting: {:?}", greeting);

    let account = Try::direct(|s| {
        let owner = s.extract(lookup(&settings, "owner").to_try())?;
        let age = s.extract(lookup(&settings, "age").to_try().flat_map(parse_age))?;
        Ok(Account {
            owner: owner.to_string(),
            age,
        })
    });
    info!("account: {:?}", account);

    let checked = Validation::combine(
        lookup(&settings, "owner").to_validation("owner missing"),
        lookup(&settings, "email").to_validation("email missing"),
    )
    .combine(parse_age("abc").into_validation().map_error(|_| "age invalid"))
    .ap(|owner, email, age| format!("{} <{}> {}", owner, email, age));
    info!("validation: {:?}", checked);

    let routed: Either<String, u32> = Either::direct(|outer| {
        let inner = Presence::scoped(|inner| {
            let raw = inner.extract(lookup(&settings, "age"))?;
            outer.extract(Either::from(
                raw.parse::<u32>().map_err(|error| error.to_string()),
            ))
        })?;
        Ok(inner.get_or_else(0))
    });
    info!("routed: {:?}", routed);

    let account = Result::from(account)?;
    info!("{} is {}", account.owner, account.age);

    Ok(())
}
