// ABOUTME: GAEB DA XML tender export for proposal line items
// ABOUTME: Emits a strongly reduced, non-schema-validated DA83 3.2 subset

use chrono::Utc;
use tracing::debug;

use crate::blob::{BlobClient, ExportResult};
use offerkit_core::LineItem;

/// Exports line items as a strongly reduced GAEB DA XML 3.2 (D83) document.
///
/// This is a deliberate subset of the real tendering interchange schema: one
/// flat category, no nested outline levels, and no validation against the
/// GAEB XSD at write time.
pub struct GaebExporter {
    blob: BlobClient,
}

impl GaebExporter {
    pub fn new(blob: BlobClient) -> Self {
        Self { blob }
    }

    /// Serialize the line items and publish the document, returning the
    /// public URL or `None` when no storage token is configured.
    pub async fn export(&self, line_items: &[LineItem]) -> ExportResult<Option<String>> {
        let xml = render_gaeb(line_items);
        let filename = format!("proposal-{}.x83", Utc::now().timestamp_millis());
        debug!("Rendering GAEB export with {} items", line_items.len());

        self.blob.put(&filename, xml, "application/xml").await
    }
}

/// Render the reduced GAEB document: one `<Item>` per line item, outline
/// numbers in the fixed two-segment `01.NNN` scheme.
pub fn render_gaeb(line_items: &[LineItem]) -> String {
    let header = r#"<?xml version="1.0" encoding="UTF-8"?>
<GAEB xmlns="http://www.gaeb.de/GAEB_DA_XML/DA83/3.2">
  <BoQ>
    <BoQBody>
      <BoQCtgy R_Cat_ID="1">
        <ItemList>"#;
    let footer = r#"
        </ItemList>
      </BoQCtgy>
    </BoQBody>
  </BoQ>
</GAEB>"#;

    let items_xml: String = line_items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let outline_num = format!("01.{:03}", idx + 1);
            format!(
                r#"
          <Item>
            <OutlineNum>{}</OutlineNum>
            <Description>
              <OutlineText>
                <TextOut>{}</TextOut>
              </OutlineText>
            </Description>
            <Qty>{}</Qty>
            <QU>{}</QU>
            <UP>{:.2}</UP>
          </Item>"#,
                outline_num,
                escape_xml(&item.description),
                item.quantity,
                escape_xml(&item.unit),
                item.unit_price
            )
        })
        .collect();

    format!("{}{}{}", header, items_xml, footer)
}

/// Escape the five standard XML entities.
fn escape_xml(unsafe_text: &str) -> String {
    unsafe_text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
