//! Course file transfer commands.

use std::path::Path;

use campus_client::services::FileTransferService;
use campus_client::{CancelHandle, require_authenticated};
use campus_core::{CourseId, FileId};

use super::{CommandError, Context};

fn transfer_service(ctx: &Context) -> FileTransferService {
    FileTransferService::new(
        ctx.http.clone(),
        ctx.config.courses_url.clone(),
        ctx.session.clone(),
    )
}

/// Upload a local file to a course.
pub async fn upload(ctx: &Context, course: i64, path: &Path) -> Result<(), CommandError> {
    ctx.enforce(require_authenticated(&ctx.session.current()))?;

    let cancel = CancelHandle::new();
    transfer_service(ctx)
        .upload(CourseId::new(course), path, &cancel)
        .await?;
    println!("Uploaded {} to course {course}", path.display());
    Ok(())
}

/// List the files attached to a course.
pub async fn list(ctx: &Context, course: i64) -> Result<(), CommandError> {
    ctx.enforce(require_authenticated(&ctx.session.current()))?;

    let files = transfer_service(ctx)
        .list(CourseId::new(course), &CancelHandle::new())
        .await?;
    if files.is_empty() {
        println!("No files in course {course}.");
        return Ok(());
    }
    for file in files {
        println!("{:>6}  {}", file.id, file.name);
    }
    Ok(())
}

/// Download a course file to a local path.
pub async fn download(
    ctx: &Context,
    course: i64,
    file: i64,
    output: &Path,
) -> Result<(), CommandError> {
    ctx.enforce(require_authenticated(&ctx.session.current()))?;

    let cancel = CancelHandle::new();
    let written = transfer_service(ctx)
        .download(CourseId::new(course), FileId::new(file), output, &cancel)
        .await?;
    println!("Saved file {file} to {}", written.display());
    Ok(())
}
