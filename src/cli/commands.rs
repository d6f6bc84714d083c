use crate::app::{AppContext, Result};
use crate::domain::{FeedQuery, Photo, Rover};
use crate::feed::{FeedMachine, FeedMessage, FeedPhase};

/// Print up to `pages` pages of photos for one rover and sol.
pub async fn list_photos(ctx: &AppContext, rover: Rover, sol: u32, pages: u32) -> Result<()> {
    let fetcher = ctx.fetcher();
    let mut machine = FeedMachine::new(FeedQuery::new(rover, sol));

    machine.dispatch(fetcher.as_ref(), FeedMessage::Reload).await;
    for _ in 1..pages {
        if !machine.state().can_load_more() {
            break;
        }
        machine.dispatch(fetcher.as_ref(), FeedMessage::LoadMore).await;
    }

    let state = machine.state();
    if let Some(error) = &state.error {
        if state.phase == FeedPhase::Errored || state.phase == FeedPhase::Empty {
            println!("{}", error);
            return Ok(());
        }
    }

    println!(
        "{} sol {}: {} photos ({} page{}{})",
        rover,
        sol,
        state.photos.len(),
        state.page,
        if state.page == 1 { "" } else { "s" },
        if state.has_more { ", more available" } else { "" }
    );
    println!();
    for photo in &state.photos {
        println!("{}", photo_line(photo));
    }

    if let Some(banner) = state.banner() {
        println!();
        println!("{}", banner);
    }

    Ok(())
}

/// Print the mission manifest and the latest sols that have photos.
pub async fn show_manifest(ctx: &AppContext, rover: Rover, limit: usize) -> Result<()> {
    let manifest = ctx.client.fetch_manifest(rover).await?;

    println!("{}", manifest.name);
    println!("  Status:       {}", manifest.status);
    println!("  Launched:     {}", manifest.launch_date);
    println!("  Landed:       {}", manifest.landing_date);
    println!("  Latest sol:   {} ({})", manifest.max_sol, manifest.max_date);
    println!("  Total photos: {}", manifest.total_photos);

    let recent = manifest.recent_sols(limit);
    if recent.is_empty() {
        return Ok(());
    }

    println!();
    println!("{:>6}  {:<10}  {:>6}  CAMERAS", "SOL", "DATE", "PHOTOS");
    for sol in recent {
        println!(
            "{:>6}  {:<10}  {:>6}  {}",
            sol.sol,
            sol.earth_date,
            sol.total_photos,
            sol.cameras.join(",")
        );
    }

    Ok(())
}

fn photo_line(photo: &Photo) -> String {
    format!(
        "{:>9}  {}  {:<8}  {}",
        photo.id,
        photo.short_date(),
        photo.camera.name,
        photo.img_src
    )
}
