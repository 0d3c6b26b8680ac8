//! Builds a spreadsheet response and sends it the way a server would: headers first,
//! then the body frame by frame, here into a file instead of a socket.
//!
//! ```sh
//! cargo run -p spreadsheet-response --example download -- xlsx
//! cargo run -p spreadsheet-response --example download -- csv
//! ```

use http_body_util::BodyExt;
use rust_xlsxwriter::Workbook;
use spreadsheet_response::{CsvWriter, SpreadsheetResponse};
use std::error::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

const REGIONS: [(&str, f64); 4] = [("Nord", 1250.5), ("Süd", 980.0), ("Ost", 1410.25), ("West", 875.75)];

fn workbook() -> Result<Workbook, rust_xlsxwriter::XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "Region")?;
    worksheet.write_string(0, 1, "Umsatz")?;
    for (row, (region, amount)) in (1u32..).zip(REGIONS) {
        worksheet.write_string(row, 0, region)?;
        worksheet.write_number(row, 1, amount)?;
    }
    Ok(workbook)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let format = std::env::args().nth(1).unwrap_or_else(|| "xlsx".into());
    let builder = SpreadsheetResponse::builder(workbook()?, "Umsätze: 2021/Q3");
    let builder = match format.as_str() {
        "csv" => {
            let mut rows = vec![vec!["Region".to_owned(), "Umsatz".to_owned()]];
            rows.extend(REGIONS.iter().map(|(region, amount)| vec![(*region).to_owned(), amount.to_string()]));
            builder.writer(CsvWriter::from_rows(rows).with_bom(true))
        }
        _ => builder,
    };

    let response = builder.build()?.into_http();
    for (name, value) in response.headers() {
        info!("{}: {}", name, value.to_str()?);
    }

    let path = std::env::temp_dir().join(format!("download.{format}"));
    let mut file = File::create(&path).await?;
    let mut body = response.into_body();
    while let Some(frame) = body.frame().await {
        if let Ok(data) = frame?.into_data() {
            file.write_all(&data).await?;
        }
    }
    file.flush().await?;

    info!(path = %path.display(), "download saved");
    Ok(())
}
