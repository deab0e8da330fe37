use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use backoffice_admin::{
    AppState,
    auth::MenuItem,
    models::{EntityId, ImageUpload, Product, Role, User},
    routes::{
        Route,
        params::{ProductQuery, ProductSortBy, SortOrder},
    },
    screens::{ProductField, UserField, VariantField},
};

#[derive(Parser)]
#[command(version, about = "Back-office administration from the terminal", long_about = None)]
#[command(name = "backoffice")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BACKOFFICE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Print the navigation menu visible to this session
    Menu,
    #[command(subcommand)]
    Products(ProductCommand),
    #[command(subcommand)]
    Users(UserCommand),
    /// List categories
    Categories,
    /// List sites
    Sites,
}

#[derive(Subcommand)]
pub enum ProductCommand {
    List(ProductListArgs),
    Create(ProductCreateArgs),
    /// Delete one product, or several at once
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Args)]
pub struct ProductListArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long, default_value = "created_at")]
    sort_by: ProductSortBy,
    #[arg(long, default_value = "desc")]
    order: SortOrder,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = 10)]
    per_page: u32,
}

#[derive(Args)]
pub struct ProductCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "0")]
    price: Decimal,
    #[arg(long)]
    site: Option<String>,
    #[arg(long)]
    category: Option<String>,
    /// SIZE:COLOR:PRICE:STOCK, repeatable
    #[arg(long = "variant")]
    variants: Vec<String>,
    /// Image file to upload, repeatable
    #[arg(long = "image")]
    images: Vec<PathBuf>,
}

#[derive(Subcommand)]
pub enum UserCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        rows: u32,
    },
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "BACKOFFICE_NEW_USER_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        role: Option<Role>,
    },
    Update {
        id: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        password: Option<String>,
    },
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

impl Commands {
    pub async fn run(self, state: &AppState) -> anyhow::Result<()> {
        match self {
            Commands::Login { email, password } => {
                let user = state.auth.login(&email, &password).await?;
                match user {
                    Some(user) => println!("signed in as {}", user.email),
                    None => println!("signed in"),
                }
                Ok(())
            }
            Commands::Logout => {
                if let Err(err) = state.auth.logout().await {
                    tracing::warn!(error = %err, "server logout failed; local session cleared");
                }
                println!("signed out");
                Ok(())
            }
            Commands::Whoami => {
                match state.auth.current_user().await? {
                    Some(user) => println!(
                        "{} ({})",
                        user.email,
                        user.role.map(|r| r.as_str()).unwrap_or("no role")
                    ),
                    None => println!("not signed in"),
                }
                Ok(())
            }
            Commands::Menu => {
                for section in state.guard.visible_menu() {
                    println!("{}", section.label);
                    for item in &section.items {
                        print_menu_item(item, 1);
                    }
                }
                Ok(())
            }
            Commands::Products(cmd) => {
                require(state, Route::Products)?;
                cmd.run(state).await
            }
            Commands::Users(cmd) => {
                require(state, Route::Users)?;
                cmd.run(state).await
            }
            Commands::Categories => {
                require(state, Route::Categories)?;
                for c in state.categories.list().await? {
                    println!("{}\t{}", c.id, c.name);
                }
                Ok(())
            }
            Commands::Sites => {
                require(state, Route::Products)?;
                for s in state.sites.list().await? {
                    println!("{}\t{}", s.id, s.name);
                }
                Ok(())
            }
        }
    }
}

fn require(state: &AppState, route: Route) -> anyhow::Result<()> {
    if state.guard.visit(route) != route {
        bail!("not signed in; run `backoffice login` first");
    }
    Ok(())
}

fn print_menu_item(item: &MenuItem, depth: usize) {
    let indent = "  ".repeat(depth);
    match item.route {
        Some(route) => println!("{indent}{} -> {}", item.label, route.path()),
        None => println!("{indent}{}", item.label),
    }
    for child in &item.items {
        print_menu_item(child, depth + 1);
    }
}

impl ProductCommand {
    async fn run(self, state: &AppState) -> anyhow::Result<()> {
        let mut screen = state.product_screen();
        match self {
            ProductCommand::List(args) => {
                let query = ProductQuery {
                    name: args.name,
                    category_id: args.category.map(EntityId::new),
                    sort_by: args.sort_by,
                    sort_order: args.order,
                    page: args.page,
                    per_page: args.per_page,
                };
                screen.list(query).await?;
                let refs = state.reference_data().await.unwrap_or_default();
                for p in &screen.store().items {
                    let category = p
                        .category_id
                        .as_ref()
                        .and_then(|id| refs.category_name(id))
                        .unwrap_or("-");
                    println!(
                        "{}\t{}\t{}\t{}",
                        p.id.as_ref().map(EntityId::as_str).unwrap_or("-"),
                        p.name,
                        p.price,
                        category
                    );
                }
                if let Some(meta) = screen.store().pagination {
                    println!(
                        "page {} of {} ({} products)",
                        meta.current_page,
                        meta.page_count(),
                        meta.total_items
                    );
                }
                Ok(())
            }
            ProductCommand::Create(args) => {
                screen.open_create();
                screen.set_field(ProductField::Name(args.name));
                screen.set_field(ProductField::Description(args.description));
                screen.set_field(ProductField::Price(args.price));
                screen.set_field(ProductField::SiteId(args.site.map(EntityId::new)));
                screen.set_field(ProductField::CategoryId(args.category.map(EntityId::new)));
                for (i, raw) in args.variants.iter().enumerate() {
                    screen.add_variant();
                    for field in parse_variant(raw)? {
                        screen.set_variant_field(i, field)?;
                    }
                }
                let mut uploads = Vec::with_capacity(args.images.len());
                for path in &args.images {
                    uploads.push(
                        ImageUpload::from_path(path)
                            .await
                            .with_context(|| format!("reading {}", path.display()))?,
                    );
                }
                screen.attach_images(uploads);
                let saved: Product = screen.save().await?;
                println!(
                    "created {}",
                    saved.id.as_ref().map(EntityId::as_str).unwrap_or("product")
                );
                Ok(())
            }
            ProductCommand::Delete { ids } => {
                let mut rows: Vec<Product> = unique_ids(ids)
                    .into_iter()
                    .map(|id| Product {
                        id: Some(id),
                        ..Product::default()
                    })
                    .collect();
                let count = rows.len();
                if count == 1 {
                    if let Some(row) = rows.pop() {
                        screen.confirm_delete(&row);
                        screen.remove_confirmed().await?;
                    }
                } else {
                    screen.set_selection(rows);
                    screen.confirm_delete_selected()?;
                    screen.remove_selected().await?;
                }
                println!("deleted {count} product(s)");
                Ok(())
            }
        }
    }
}

/// Ids in the order given, repeats dropped.
fn unique_ids(ids: Vec<String>) -> Vec<EntityId> {
    let mut unique: Vec<EntityId> = Vec::with_capacity(ids.len());
    for id in ids.into_iter().map(EntityId::new) {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

fn parse_variant(raw: &str) -> anyhow::Result<Vec<VariantField>> {
    let parts: Vec<&str> = raw.split(':').collect();
    let [size, color, price, stock] = parts.as_slice() else {
        bail!("variant `{raw}` must look like SIZE:COLOR:PRICE:STOCK");
    };
    Ok(vec![
        VariantField::Size(size.to_string()),
        VariantField::Color(color.to_string()),
        VariantField::Price(price.parse().with_context(|| format!("price in `{raw}`"))?),
        VariantField::Stock(stock.parse().with_context(|| format!("stock in `{raw}`"))?),
    ])
}

impl UserCommand {
    async fn run(self, state: &AppState) -> anyhow::Result<()> {
        let mut screen = state.user_screen();
        match self {
            UserCommand::List { page, rows } => {
                screen.refresh().await?;
                screen.set_rows_per_page(rows)?;
                screen.go_to_page(page);
                for u in screen.visible_rows() {
                    println!(
                        "{}\t{}\t{}\t{}",
                        u.id.as_ref().map(EntityId::as_str).unwrap_or("-"),
                        u.full_name(),
                        u.email,
                        u.role.map(|r| r.as_str()).unwrap_or("-")
                    );
                }
                println!("{}", screen.page_report());
                Ok(())
            }
            UserCommand::Create {
                first_name,
                last_name,
                email,
                password,
                role,
            } => {
                screen.open_create();
                screen.set_field(UserField::FirstName(first_name));
                screen.set_field(UserField::LastName(last_name));
                screen.set_field(UserField::Email(email));
                screen.set_field(UserField::Password(password));
                screen.set_field(UserField::Role(role));
                let saved = screen.save().await?;
                println!("created {}", saved.email);
                Ok(())
            }
            UserCommand::Update {
                id,
                first_name,
                last_name,
                email,
                role,
                password,
            } => {
                screen.refresh().await?;
                let id = EntityId::new(id);
                let Some(existing) = screen
                    .store()
                    .items
                    .iter()
                    .find(|u| u.id.as_ref() == Some(&id))
                    .cloned()
                else {
                    bail!("no user with id {id}");
                };
                screen.open_edit(&existing);
                let edits = [
                    first_name.map(UserField::FirstName),
                    last_name.map(UserField::LastName),
                    email.map(UserField::Email),
                    role.map(|r| UserField::Role(Some(r))),
                    password.map(UserField::Password),
                ];
                for field in edits.into_iter().flatten() {
                    screen.set_field(field);
                }
                let saved = screen.save().await?;
                println!("updated {}", saved.email);
                Ok(())
            }
            UserCommand::Delete { ids } => {
                screen.refresh().await?;
                let wanted = unique_ids(ids);
                let rows: Vec<User> = screen
                    .store()
                    .items
                    .iter()
                    .filter(|u| u.id.as_ref().is_some_and(|id| wanted.contains(id)))
                    .cloned()
                    .collect();
                if rows.len() != wanted.len() {
                    bail!("some of the given user ids do not exist");
                }
                screen.set_selection(rows);
                screen.confirm_delete_selected()?;
                screen.remove_selected().await?;
                println!("deleted {} user(s)", wanted.len());
                Ok(())
            }
        }
    }
}
