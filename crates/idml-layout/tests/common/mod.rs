//! Shared IDML fixtures for integration tests
#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const PKG_NS: &str = "http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging";

pub const DESIGNMAP: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<?aid style="50" type="document" readerVersion="6.0" featureSet="257" product="18.0(148)" ?>
<Document xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="18.0" Self="d">
  <idPkg:Graphic src="Resources/Graphic.xml"/>
  <idPkg:Styles src="Resources/Styles.xml"/>
  <Layer Self="uVisible" Name="Layer 1" Visible="true"/>
  <Layer Self="uHidden" Name="Notes" Visible="false"/>
  <idPkg:MasterSpread src="MasterSpreads/MasterSpread_m1.xml"/>
  <idPkg:Spread src="Spreads/Spread_s1.xml"/>
  <idPkg:Spread src="Spreads/Spread_missing.xml"/>
  <idPkg:Spread src="Spreads/Spread_s2.xml"/>
  <Section Self="sec1" Length="3" Name="" PageNumberStart="3" PageStart="p1" Marker=""/>
  <idPkg:Story src="Stories/Story_u10.xml"/>
  <idPkg:Story src="Stories/Story_u20.xml"/>
</Document>"#;

pub const GRAPHIC: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Graphic xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="18.0">
  <Color Self="Color/Red" Model="Process" Space="CMYK" ColorValue="0 100 100 0" Name="Red"/>
  <Color Self="Color/Blue" Model="Process" Space="RGB" ColorValue="0 0 255" Name="Blue"/>
</idPkg:Graphic>"#;

pub const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Styles xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="18.0">
  <RootParagraphStyleGroup Self="u79">
    <ParagraphStyle Self="ParagraphStyle/Body" Name="Body" PointSize="11" FontStyle="Regular"/>
  </RootParagraphStyleGroup>
  <RootCharacterStyleGroup Self="u7a">
    <CharacterStyle Self="CharacterStyle/Strong" Name="Strong" FontStyle="Bold"/>
  </RootCharacterStyleGroup>
</idPkg:Styles>"#;

pub const MASTER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:MasterSpread xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="18.0">
  <MasterSpread Self="m1" Name="A-Master" ItemTransform="1 0 0 1 0 0">
    <Page Self="m1p1" GeometricBounds="0 0 792 612" ItemTransform="1 0 0 1 0 0">
      <MarginPreference ColumnCount="2" ColumnGutter="12" Top="36" Bottom="36" Left="48" Right="48"/>
    </Page>
    <TextFrame Self="m1tf" ParentStory="uMaster" GeometricBounds="0 0 10 10"/>
  </MasterSpread>
</idPkg:MasterSpread>"#;

pub const SPREAD_1: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Spread xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="18.0">
  <Spread Self="s1" ItemTransform="1 0 0 1 0 0">
    <Page Self="p1" Name="1" AppliedMaster="m1" GeometricBounds="0 0 792 612" ItemTransform="1 0 0 1 0 0"/>
    <Page Self="p2" Name="2" AppliedMaster="m1" GeometricBounds="0 0 792 612" ItemTransform="1 0 0 1 612 0">
      <MarginPreference ColumnCount="1" Top="10" Bottom="0" Left="0" Right="0"/>
    </Page>
    <TextFrame Self="tf1" ParentStory="u10" ItemLayer="uVisible" GeometricBounds="72 72 720 540" ItemTransform="1 0 0 1 0 0"/>
    <TextFrame Self="tfPlaceholder" ParentStory="u30" ContentType="GraphicType" GeometricBounds="0 0 10 10"/>
    <Rectangle Self="r1" ItemLayer="uVisible" GeometricBounds="0 0 100 100" ItemTransform="1 0 0 1 50 50" FillColor="Color/Red"/>
    <Group Self="g1" ItemTransform="1 0 0 1 612 0">
      <Oval Self="o1" GeometricBounds="0 0 20 20"/>
      <Rectangle Self="hidden" ItemLayer="uHidden" GeometricBounds="0 0 20 20"/>
      <Rectangle Self="img" GeometricBounds="0 0 50 50" ItemTransform="1 0 0 1 0 0">
        <Image Self="i1" ItemTransform="0.5 0 0 0.5 0 0">
          <Link Self="l1" LinkResourceURI="file:/images/photo.jpg" StoredState="Normal"/>
        </Image>
      </Rectangle>
    </Group>
    <Group Self="gHidden" ItemLayer="uHidden">
      <Rectangle Self="insideHidden" GeometricBounds="0 0 5 5"/>
    </Group>
  </Spread>
</idPkg:Spread>"#;

pub const SPREAD_2: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Spread xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="18.0">
  <Spread Self="s2" ItemTransform="1 0 0 1 0 0">
    <Page Self="p3" Name="3" AppliedMaster="n" GeometricBounds="0 0 792 612" ItemTransform="1 0 0 1 0 0"/>
    <TextFrame Self="tf2" ParentStory="u10" PreviousTextFrame="tf1" GeometricBounds="0 0 100 100" ItemTransform="1 0 0 1 0 2000"/>
    <TextFrame Self="tf3" ParentStory="u99" GeometricBounds="0 0 100 100"/>
  </Spread>
</idPkg:Spread>"#;

pub const STORY_U10: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Story xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="18.0">
  <Story Self="u10">
    <ParagraphStyleRange AppliedParagraphStyle="ParagraphStyle/Body">
      <CharacterStyleRange AppliedCharacterStyle="CharacterStyle/Strong">
        <Content>Hello</Content>
        <Rectangle Self="inlineRect" GeometricBounds="0 0 10 10" ItemTransform="1 0 0 1 10 1990"/>
        <Polygon Self="inlinePoly" ItemTransform="1 0 0 1 100 5">
          <Properties><PathGeometry><GeometryPathType PathOpen="false"><PathPointArray>
            <PathPointType Anchor="0 0"/><PathPointType Anchor="10 0"/><PathPointType Anchor="10 10"/>
          </PathPointArray></GeometryPathType></PathGeometry></Properties>
        </Polygon>
      </CharacterStyleRange>
    </ParagraphStyleRange>
    <ParagraphStyleRange AppliedParagraphStyle="ParagraphStyle/Body">
      <CharacterStyleRange>
        <Table Self="t1" HeaderRowCount="1" BodyRowCount="1">
          <Row Self="t1r0" Name="0"/>
          <Row Self="t1r1" Name="1"/>
          <Column Self="t1c0" Name="0" SingleColumnWidth="100"/>
          <Column Self="t1c1" Name="1" SingleColumnWidth="150"/>
          <Cell Self="t1i0" Name="0:0"><ParagraphStyleRange><CharacterStyleRange><Content>A1</Content></CharacterStyleRange></ParagraphStyleRange></Cell>
          <Cell Self="t1i1" Name="1:0"><ParagraphStyleRange><CharacterStyleRange><Content>B1</Content></CharacterStyleRange></ParagraphStyleRange></Cell>
          <Cell Self="t1i2" Name="0:1"><ParagraphStyleRange><CharacterStyleRange><Content>A2</Content></CharacterStyleRange></ParagraphStyleRange></Cell>
        </Table>
      </CharacterStyleRange>
    </ParagraphStyleRange>
  </Story>
</idPkg:Story>"#;

pub const STORY_U20: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Story xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="18.0">
  <Story Self="u20"><ParagraphStyleRange><CharacterStyleRange><Content>unreferenced</Content></CharacterStyleRange></ParagraphStyleRange></Story>
</idPkg:Story>"#;

/// Package files by relative path
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    files: Vec<(String, String)>,
}

impl Fixture {
    /// Empty package
    pub fn empty() -> Self {
        Self::default()
    }

    /// The sample package used across integration tests
    pub fn sample() -> Self {
        Self::empty()
            .with_file("designmap.xml", DESIGNMAP)
            .with_file("Resources/Graphic.xml", GRAPHIC)
            .with_file("Resources/Styles.xml", STYLES)
            .with_file("MasterSpreads/MasterSpread_m1.xml", MASTER)
            .with_file("Spreads/Spread_s1.xml", SPREAD_1)
            .with_file("Spreads/Spread_s2.xml", SPREAD_2)
            .with_file("Stories/Story_u10.xml", STORY_U10)
            .with_file("Stories/Story_u20.xml", STORY_U20)
    }

    /// Add or replace a file
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.retain(|(p, _)| p != path);
        self.files.push((path.to_string(), content.to_string()));
        self
    }

    /// Remove a file
    pub fn without_file(mut self, path: &str) -> Self {
        self.files.retain(|(p, _)| p != path);
        self
    }

    /// Write the files into a fresh directory
    pub fn write_dir(&self) -> TempDir {
        let dir = tempfile::tempdir().expect("create fixture dir");
        self.write_into(dir.path());
        dir
    }

    /// Write the files into `root`
    pub fn write_into(&self, root: &Path) {
        for (path, content) in &self.files {
            let target = root.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).expect("create fixture subdir");
            }
            fs::write(&target, content).expect("write fixture file");
        }
    }

    /// Zip the files into `sample.idml` inside a fresh directory
    pub fn write_zip(&self) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("create zip dir");
        let path = dir.path().join("sample.idml");
        let file = File::create(&path).expect("create zip file");
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        zip.start_file("mimetype", options).expect("start mimetype");
        zip.write_all(b"application/vnd.adobe.indesign-idml-package")
            .expect("write mimetype");
        for (name, content) in &self.files {
            zip.start_file(name.as_str(), options).expect("start entry");
            zip.write_all(content.as_bytes()).expect("write entry");
        }
        zip.finish().expect("finish zip");
        (dir, path)
    }
}

/// A spread file holding `body` inside its `Spread` element
pub fn spread_file(id: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<idPkg:Spread xmlns:idPkg="{PKG_NS}" DOMVersion="18.0"><Spread Self="{id}">{body}</Spread></idPkg:Spread>"#
    )
}

/// Initialise logging once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
