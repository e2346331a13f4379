//! Common test fixtures: realistic product names and header contents.

/// Product names as delivered by the ground segments.
pub mod names {
    pub const OLCI_ERR: &str = "S3A_OL_1_ERR____20200101T100000_20200101T104000_20200102T120000_2400_053_122______MAR_O_NT_002.SEN3";
    pub const OLCI_EFR: &str = "S3B_OL_1_EFR____20210615T093000_20210615T093300_20210616T140000_0179_053_236_2160_MAR_O_NT_002.SEN3";
    pub const OLCI_WFR: &str = "S3A_OL_2_WFR____20220301T101500_20220301T101800_20220302T183000_0179_082_236_2340_MAR_O_NT_003.SEN3";
    pub const SEVIRI: &str = "MSG4-SEVI-MSG15-0100-NA-20210101121243.184000000Z-NA.nat";
    pub const SEVIRI_RSS: &str = "MSG3-SEVI-MSG15-0100-NA-20210101120743.650000000Z-NA.nat";
    pub const ASCAT: &str = "ASCA_SMO_02_M01_20230101000000Z_20230101014158Z_N_O_20230101013051Z.nat";
}

/// Sensing periods matching [`names`].
pub mod times {
    pub const OLCI_ERR_START: &str = "2020-01-01T10:00:00.000000Z";
    pub const OLCI_ERR_STOP: &str = "2020-01-01T10:40:00.000000Z";
    pub const SEVIRI_START: &str = "20210101120010.123";
    pub const SEVIRI_END: &str = "20210101121243.184";
    pub const ASCAT_START: &str = "20230101000000Z";
    pub const ASCAT_END: &str = "20230101014158Z";
}

/// Contents of a SAFE `xfdumanifest.xml`.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestSpec {
    /// e.g. `OL_1_ERR___`
    pub product_type: String,
    pub start: Option<String>,
    pub stop: Option<String>,
    /// Footprint as `(lat, lon)` pairs, the SAFE order
    pub footprint: Vec<(f64, f64)>,
    /// `(rows, cols)`
    pub image_size: Option<(usize, usize)>,
}

impl ManifestSpec {
    /// Manifest of [`names::OLCI_ERR`].
    pub fn olci_err() -> Self {
        Self {
            product_type: "OL_1_ERR___".to_string(),
            start: Some(times::OLCI_ERR_START.to_string()),
            stop: Some(times::OLCI_ERR_STOP.to_string()),
            footprint: vec![
                (40.0, 10.0),
                (41.5, 20.0),
                (30.0, 22.0),
                (29.0, 12.0),
                (40.0, 10.0),
            ],
            image_size: Some((1520, 1217)),
        }
    }

    pub fn with_product_type(mut self, product_type: &str) -> Self {
        self.product_type = product_type.to_string();
        self
    }

    pub fn without_times(mut self) -> Self {
        self.start = None;
        self.stop = None;
        self
    }

    pub fn without_image_size(mut self) -> Self {
        self.image_size = None;
        self
    }

    /// Render the manifest XML.
    pub fn to_xml(&self) -> String {
        let mut period = String::new();
        if let Some(start) = &self.start {
            period.push_str(&format!(
                "<sentinel-safe:startTime>{start}</sentinel-safe:startTime>"
            ));
        }
        if let Some(stop) = &self.stop {
            period.push_str(&format!(
                "<sentinel-safe:stopTime>{stop}</sentinel-safe:stopTime>"
            ));
        }

        let image_size = match self.image_size {
            Some((rows, cols)) => format!(
                "<olci:imageSize grid=\"Native\">\
                 <sentinel3:startOffset>0</sentinel3:startOffset>\
                 <sentinel3:numberOfLines>{rows}</sentinel3:numberOfLines>\
                 <sentinel3:numberOfElements>{cols}</sentinel3:numberOfElements>\
                 </olci:imageSize>"
            ),
            None => String::new(),
        };

        let pos_list = self
            .footprint
            .iter()
            .map(|(lat, lon)| format!("{lat} {lon}"))
            .collect::<Vec<_>>()
            .join(" ");

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<xfdu:XFDU xmlns:xfdu="urn:ccsds:schema:xfdu:1" xmlns:gml="http://www.opengis.net/gml"
           xmlns:sentinel-safe="http://www.esa.int/safe/sentinel/1.1"
           xmlns:sentinel3="http://www.esa.int/safe/sentinel/sentinel-3/1.0"
           xmlns:olci="http://www.esa.int/safe/sentinel/sentinel-3/olci/1.0">
  <metadataSection>
    <metadataObject ID="acquisitionPeriod"><metadataWrap><xmlData>
      <sentinel-safe:acquisitionPeriod>{period}</sentinel-safe:acquisitionPeriod>
    </xmlData></metadataWrap></metadataObject>
    <metadataObject ID="generalProductInformation"><metadataWrap><xmlData>
      <sentinel3:generalProductInformation>
        <sentinel3:productType>{product_type}</sentinel3:productType>
      </sentinel3:generalProductInformation>
    </xmlData></metadataWrap></metadataObject>
    <metadataObject ID="olciProductInformation"><metadataWrap><xmlData>
      <olci:olciProductInformation>{image_size}</olci:olciProductInformation>
    </xmlData></metadataWrap></metadataObject>
    <metadataObject ID="measurementFrameSet"><metadataWrap><xmlData>
      <sentinel-safe:frameSet><sentinel-safe:footPrint>
        <gml:posList>{pos_list}</gml:posList>
      </sentinel-safe:footPrint></sentinel-safe:frameSet>
    </xmlData></metadataWrap></metadataObject>
  </metadataSection>
</xfdu:XFDU>
"#,
            product_type = self.product_type,
        )
    }
}

/// ASCII main product header of an MSG native file.
///
/// `None` fields are left out of the header.
pub fn seviri_header(start: Option<&str>, end: Option<&str>, llos: Option<f64>) -> Vec<u8> {
    let mut lines = vec![
        "FormatName                  : NATIVE".to_string(),
        "FormatDocumentName          : MSG Level 1.5 Native Format File Definition".to_string(),
        "FormatDocumentMajorVersion  : 1".to_string(),
        "PLATFORM                    : MSG4".to_string(),
    ];
    if let Some(start) = start {
        lines.push(format!("SENSING_START               : {start}"));
    }
    if let Some(end) = end {
        lines.push(format!("SENSING_END                 : {end}"));
    }
    if let Some(llos) = llos {
        lines.push(format!("LLOS                        : {llos}"));
    }

    let mut bytes = lines.join("\n").into_bytes();
    bytes.push(b'\n');
    bytes
}

/// Generic record header plus main product header of an EPS file.
pub fn eps_mphr(
    instrument: &str,
    start: Option<&str>,
    end: Option<&str>,
    total_mdr: Option<usize>,
) -> Vec<u8> {
    let mut body = vec![
        format!("PRODUCT_NAME                  = {}", names::ASCAT.trim_end_matches(".nat")),
        "PARENT_PRODUCT_NAME_1         = x".to_string(),
        format!("INSTRUMENT_ID                 = {instrument}"),
        "INSTRUMENT_MODEL              = 1".to_string(),
        "PRODUCT_TYPE                  = SMO".to_string(),
        "PROCESSING_LEVEL              = 02".to_string(),
        "SPACECRAFT_ID                 = M01".to_string(),
    ];
    if let Some(start) = start {
        body.push(format!("SENSING_START                 = {start}"));
    }
    if let Some(end) = end {
        body.push(format!("SENSING_END                   = {end}"));
    }
    if let Some(total_mdr) = total_mdr {
        body.push(format!("TOTAL_MDR                     = {total_mdr}"));
    }
    let mut body = body.join("\n").into_bytes();
    body.push(b'\n');

    let record_size = (20 + body.len()) as u32;
    // class 1 (MPHR), group 0, subclass 0, version 2
    let mut bytes = vec![1u8, 0, 0, 2];
    bytes.extend_from_slice(&record_size.to_be_bytes());
    // 2023-01-01T00:00:00Z and 01:41:58Z as days since 2000-01-01 + ms of day
    bytes.extend_from_slice(&8401u16.to_be_bytes());
    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(&8401u16.to_be_bytes());
    bytes.extend_from_slice(&6_118_000u32.to_be_bytes());
    bytes.extend_from_slice(&body);
    bytes
}
