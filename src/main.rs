#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    informe_rendimentos::run().await?;
    Ok(())
}
