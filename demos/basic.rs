//! Basic example demonstrating the FortiOS CMDB client.
//!
//! Run with:
//! ```
//! FORTIOS_HOST=fw.example.com FORTIOS_API_TOKEN=your-token cargo run --example basic
//! ```

use fortios_cmdb::{
    Address, AddressGroup, CmdbQuery, Crud, FortiClient, Metadata, MovePosition, Policy,
    RequestOptions,
};

#[tokio::main]
async fn main() -> fortios_cmdb::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating FortiOS client...");
    let client = FortiClient::from_env()?;
    println!("Connected to: {}", client.base_url());
    let options = RequestOptions::default();

    // List first page of addresses
    println!("\n--- Listing Addresses (first page) ---");
    let page = Address::list_page(&client, &CmdbQuery::new().sort("name"), 0, 10).await?;
    println!("Found {} addresses (total: {:?})", page.len(), page.total);

    for address in page.iter() {
        println!(
            "  - {} ({})",
            address.name,
            address.subnet.as_deref().or(address.fqdn.as_deref()).unwrap_or("-")
        );
    }

    // Create or update two addresses and a group holding them
    println!("\n--- Upserting demo objects ---");
    Address::subnet("demo-web01", "192.0.2.10 255.255.255.255")
        .set(&client, &options)
        .await?;
    Address::fqdn("demo-api", "api.example.com")
        .set(&client, &options)
        .await?;
    let response = AddressGroup::new("demo-group", ["demo-web01", "demo-api"])
        .set(&client, &options)
        .await?;
    println!("Group saved, revision {:?}", response.revision);

    let group = AddressGroup::get(&client, "demo-group").await?;
    println!("Members: {}", group.member_names().join(", "));

    // Show policy order and move the last policy to the top
    println!("\n--- Policies ---");
    let policies = Policy::list(&client, &CmdbQuery::new().format(["policyid", "name"])).await?;
    for policy in &policies {
        println!(
            "  #{} {}",
            policy.policyid.unwrap_or_default(),
            policy.name.as_deref().unwrap_or("")
        );
    }
    if let (Some(first), Some(last)) = (
        policies.first().and_then(|p| p.policyid),
        policies.last().and_then(|p| p.policyid),
    ) {
        if first != last {
            Policy::move_entry(
                &client,
                &last.to_string(),
                MovePosition::Before(first.to_string()),
                &options,
            )
            .await?;
            println!("Moved policy #{last} before #{first}");
        }
    }

    // Clean up
    println!("\n--- Cleaning up ---");
    AddressGroup::delete(&client, "demo-group", &options).await?;
    Address::delete(&client, "demo-web01", &options).await?;
    Address::delete(&client, "demo-api", &options).await?;
    println!("Done");

    Ok(())
}
