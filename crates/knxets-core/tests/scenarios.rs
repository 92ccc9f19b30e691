use std::fs::File;
use std::io::{Cursor, Write};
use std::path::PathBuf;

use knxets_core::{Archive, Error, ObjectFlags, RefFlags};
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::ZipWriter;

const NS11: &str = "http://knx.org/xml/project/11";
const NS12: &str = "http://knx.org/xml/project/12";
const NS13: &str = "http://knx.org/xml/project/13";

struct Fixture {
    _dir: TempDir,
    path: PathBuf,
}

fn write_archive(entries: &[(&str, &str)]) -> anyhow::Result<Fixture> {
    let _ = env_logger::builder().is_test(true).try_init();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("export.knxproj");
    let mut writer = ZipWriter::new(File::create(&path)?);
    for (name, content) in entries {
        writer.start_file(*name, FileOptions::default())?;
        writer.write_all(content.as_bytes())?;
    }
    writer.finish()?;
    Ok(Fixture { _dir: dir, path })
}

fn project_header(namespace: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<KNX xmlns="{}"><Project Id="P-01AB"><ProjectInformation Name="House"/></Project></KNX>"#,
        namespace
    )
}

const INSTALLATION_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<KNX xmlns="http://knx.org/xml/project/13" CreatedBy="ETS5" ToolVersion="5.7">
  <Project Id="P-01AB">
    <Installations>
      <Installation Name="Main" InstallationId="0">
        <Topology>
          <Area Id="A1" Name="Building" Address="1">
            <Line Id="L1" Name="Floor" Address="1">
              <DeviceInstance Id="DI-1" Name="Switch actuator" Address="5">
                <ComObjectInstanceRefs>
                  <ComObjectInstanceRef RefId="CR-7" DatapointType="1.001">
                    <Connectors>
                      <Send GroupAddressRefId="GA-9"/>
                      <Receive GroupAddressRefId="GA-10"/>
                    </Connectors>
                  </ComObjectInstanceRef>
                </ComObjectInstanceRefs>
              </DeviceInstance>
            </Line>
          </Area>
        </Topology>
        <GroupAddresses>
          <GroupRanges>
            <GroupRange Id="GR-1" Name="Lighting" RangeStart="2048" RangeEnd="4095">
              <GroupAddress Id="GA-9" Name="Kitchen switch" Address="2049"/>
              <GroupAddress Id="GA-10" Name="Kitchen status" Address="2050"/>
            </GroupRange>
          </GroupRanges>
        </GroupAddresses>
      </Installation>
    </Installations>
  </Project>
</KNX>"#;

const MANUFACTURER_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<KNX xmlns="http://knx.org/xml/project/13">
  <ManufacturerData>
    <Manufacturer RefId="M-00FA">
      <ApplicationPrograms>
        <ApplicationProgram Id="M-00FA_A-0001-10-0000" Name="Switch" ApplicationVersion="16">
          <Static>
            <ComObjectTable>
              <ComObject Id="M-00FA_A-0001-10-0000_O-0" Name="Output" Text="Switch" ObjectSize="1 Bit"
                         DatapointType="DPST-1-1" Priority="Low"
                         ReadFlag="Enabled" WriteFlag="Disabled" CommunicationFlag="Enabled"
                         TransmitFlag="Enabled" ReadOnInitFlag="Enabled"/>
            </ComObjectTable>
            <ComObjectRefs>
              <ComObjectRef Id="M-00FA_A-0001-10-0000_O-0_R-1" RefId="M-00FA_A-0001-10-0000_O-0" ReadFlag="Enabled"/>
            </ComObjectRefs>
          </Static>
        </ApplicationProgram>
      </ApplicationPrograms>
    </Manufacturer>
  </ManufacturerData>
</KNX>"#;

#[test]
fn s1_minimal_project_header() -> anyhow::Result<()> {
    let fixture = write_archive(&[("P-01AB/Project.xml", project_header(NS13).as_str())])?;
    let archive = Archive::open(&fixture.path)?;
    assert_eq!(archive.project_files().len(), 1);

    let info = archive.project_files()[0].decode_info()?;
    assert_eq!(info.id, "P-01AB");
    assert_eq!(info.name, "House");
    Ok(())
}

#[test]
fn s2_schema_alias_decodes_identically() -> anyhow::Result<()> {
    let mut decoded = Vec::new();
    for namespace in [NS11, NS12, NS13] {
        let fixture = write_archive(&[("P-01AB/Project.xml", project_header(namespace).as_str())])?;
        let archive = Archive::open(&fixture.path)?;
        decoded.push(archive.project_files()[0].decode_info()?);
    }
    assert_eq!(decoded[0], decoded[1]);
    assert_eq!(decoded[1], decoded[2]);
    Ok(())
}

fn with_namespace(xml: &str, namespace: &str) -> String {
    xml.replace(NS13, namespace)
}

#[test]
fn installation_and_manufacturer_files_decode_identically_under_aliases() -> anyhow::Result<()> {
    let mut projects = Vec::new();
    let mut manufacturers = Vec::new();
    for namespace in [NS11, NS12, NS13] {
        let installation = with_namespace(INSTALLATION_XML, namespace);
        let manufacturer = with_namespace(MANUFACTURER_XML, namespace);
        assert!(installation.contains(namespace));
        let fixture = write_archive(&[
            ("P-01AB/Project.xml", project_header(namespace).as_str()),
            ("P-01AB/0.xml", installation.as_str()),
            ("M-00FA/M-00FA_A-0001-10-0000.xml", manufacturer.as_str()),
        ])?;
        let archive = Archive::open(&fixture.path)?;
        projects.push(archive.project_files()[0].decode()?);
        manufacturers.push(archive.manufacturer_files()[0].decode()?);
    }

    assert_eq!(projects[0].installations.len(), 1);
    assert_eq!(projects[0], projects[2]);
    assert_eq!(projects[1], projects[2]);
    assert_eq!(manufacturers[0].programs.len(), 1);
    assert_eq!(manufacturers[0], manufacturers[2]);
    assert_eq!(manufacturers[1], manufacturers[2]);
    Ok(())
}

#[test]
fn s3_unsupported_schema() -> anyhow::Result<()> {
    let fixture = write_archive(&[(
        "P-01AB/Project.xml",
        project_header("http://knx.org/xml/project/20").as_str(),
    )])?;
    let archive = Archive::open(&fixture.path)?;
    match archive.project_files()[0].decode_info() {
        Err(Error::UnsupportedSchema { namespace }) => {
            assert_eq!(namespace, "http://knx.org/xml/project/20");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    Ok(())
}

#[test]
fn s4_installation_with_topology_and_connectors() -> anyhow::Result<()> {
    let fixture = write_archive(&[
        ("P-01AB/Project.xml", project_header(NS13).as_str()),
        ("P-01AB/0.xml", INSTALLATION_XML),
    ])?;
    let archive = Archive::open(&fixture.path)?;
    let project_file = &archive.project_files()[0];
    assert_eq!(project_file.installation_files().len(), 1);
    assert_eq!(project_file.installation_files()[0].installation_id().as_str(), "0");

    let project = project_file.decode()?;
    assert_eq!(project.id, "P-01AB");
    assert_eq!(project.installations.len(), 1);

    let installation = &project.installations[0];
    assert_eq!(installation.name, "Main");
    let area = &installation.topology[0];
    assert_eq!((area.id.as_str(), area.address), ("A1", 1));
    let line = &area.lines[0];
    assert_eq!(line.address, 1);
    let device = &line.devices[0];
    assert_eq!(device.address, 5);

    let object = &device.com_objects[0];
    assert_eq!(object.ref_id, "CR-7");
    assert_eq!(object.datapoint_type, "1.001");
    assert_eq!(object.connectors.len(), 2);
    assert!(!object.connectors[0].receive);
    assert_eq!(object.connectors[0].ref_id, "GA-9");
    assert!(object.connectors[1].receive);
    assert_eq!(object.connectors[1].ref_id, "GA-10");

    let range = &installation.group_addresses[0];
    assert_eq!((range.range_start, range.range_end), (2048, 4095));
    assert_eq!(range.addresses.len(), 2);

    let single = project_file.installation_files()[0].decode()?;
    assert_eq!(single.installations, project.installations);
    Ok(())
}

#[test]
fn s5_manufacturer_flags() -> anyhow::Result<()> {
    let fixture = write_archive(&[("M-00FA/M-00FA_A-0001-10-0000.xml", MANUFACTURER_XML)])?;
    let archive = Archive::open(&fixture.path)?;
    let manufacturer_file = &archive.manufacturer_files()[0];
    assert_eq!(manufacturer_file.manufacturer_id(), "M-00FA");
    assert_eq!(manufacturer_file.content_id(), "M-00FA_A-0001-10-0000");

    let data = manufacturer_file.decode()?;
    assert_eq!(data.manufacturer, "M-00FA");
    let object = &data.programs[0].objects[0];
    assert_eq!(
        object.flags,
        ObjectFlags {
            read: true,
            write: false,
            communication: true,
            transmit: true,
            update: false,
            read_on_init: true,
        }
    );
    assert_eq!(object.priority, "Low");
    Ok(())
}

#[test]
fn s6_optional_ref_flags() -> anyhow::Result<()> {
    let fixture = write_archive(&[("M-00FA/M-00FA_A-0001-10-0000.xml", MANUFACTURER_XML)])?;
    let archive = Archive::open(&fixture.path)?;
    let data = archive.manufacturer_files()[0].decode()?;

    let reference = &data.programs[0].object_refs[0];
    assert_eq!(
        reference.flags,
        RefFlags {
            read: Some(true),
            ..RefFlags::default()
        }
    );
    assert_eq!(reference.name, None);
    assert_eq!(reference.text, None);
    assert_eq!(reference.datapoint_type, None);
    assert_eq!(reference.object_size, None);
    assert_eq!(reference.priority, None);

    let resolved = reference.resolve(&data.programs[0].objects[0]);
    assert_eq!(resolved.text, "Switch");
    assert!(resolved.flags.transmit);
    Ok(())
}

#[test]
fn unknown_elements_and_attributes_do_not_change_the_model() -> anyhow::Result<()> {
    let noisy = INSTALLATION_XML
        .replace(
            r#"<Area Id="A1""#,
            r#"<Area Puid="17" Id="A1" Comment="x""#,
        )
        .replace(
            "<Topology>",
            r#"<Topology><Unassigned><DeviceInstance Id="DI-X" Address="9"/></Unassigned>"#,
        )
        .replace(
            "<Connectors>",
            r#"<Connectors Extra="1"><Annotation Text="ignored"/>"#,
        );
    let fixture = write_archive(&[
        ("P-01AB/Project.xml", project_header(NS13).as_str()),
        ("P-01AB/0.xml", INSTALLATION_XML),
        ("P-02CD/Project.xml", project_header(NS13).as_str()),
        ("P-02CD/0.xml", noisy.as_str()),
    ])?;
    let archive = Archive::open(&fixture.path)?;
    let clean = archive.project_files()[0].decode()?;
    let noisy = archive.project_files()[1].decode()?;
    assert_eq!(clean.installations, noisy.installations);
    Ok(())
}

#[test]
fn failing_installation_fails_the_whole_project() -> anyhow::Result<()> {
    let broken = INSTALLATION_XML.replace(r#"Address="5""#, r#"Address="five""#);
    let fixture = write_archive(&[
        ("P-01AB/Project.xml", project_header(NS13).as_str()),
        ("P-01AB/0.xml", INSTALLATION_XML),
        ("P-01AB/1.xml", broken.as_str()),
    ])?;
    let archive = Archive::open(&fixture.path)?;
    let project_file = &archive.project_files()[0];
    match project_file.decode() {
        Err(Error::MalformedValue { attribute, value, .. }) => {
            assert_eq!(attribute, "Address");
            assert_eq!(value, "five");
        }
        other => panic!("unexpected result: {:?}", other),
    }

    // the failed entry stream was released; the archive keeps working
    assert!(project_file.installation_files()[0].decode().is_ok());
    Ok(())
}

#[test]
fn multiple_installation_files_are_concatenated_in_scan_order() -> anyhow::Result<()> {
    let second = INSTALLATION_XML.replace(r#"Name="Main""#, r#"Name="Annex""#);
    let fixture = write_archive(&[
        ("P-01AB/Project.xml", project_header(NS13).as_str()),
        ("P-01AB/0.xml", INSTALLATION_XML),
        ("P-01AB/1.xml", second.as_str()),
    ])?;
    let archive = Archive::open(&fixture.path)?;
    let project = archive.project_files()[0].decode()?;
    let names: Vec<&str> = project.installations.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Main", "Annex"]);
    Ok(())
}

#[test]
fn installation_files_only_attach_to_their_own_project() -> anyhow::Result<()> {
    let fixture = write_archive(&[
        ("P-01AB/Project.xml", project_header(NS13).as_str()),
        ("P-02CD/0.xml", INSTALLATION_XML),
        ("P-01AB/0.xml", INSTALLATION_XML),
        ("P-01AB/sub/1.xml", INSTALLATION_XML),
    ])?;
    let archive = Archive::open(&fixture.path)?;
    let project_file = &archive.project_files()[0];
    assert_eq!(project_file.installation_files().len(), 1);
    for file in project_file.installation_files() {
        let dir = file.name().rsplit_once('/').map(|(dir, _)| dir);
        assert_eq!(dir, Some(project_file.project_id().as_str()));
    }
    Ok(())
}

#[test]
fn decoded_values_outlive_the_archive() -> anyhow::Result<()> {
    let fixture = write_archive(&[
        ("P-01AB/Project.xml", project_header(NS13).as_str()),
        ("P-01AB/0.xml", INSTALLATION_XML),
        ("M-00FA/M-00FA_A-0001-10-0000.xml", MANUFACTURER_XML),
    ])?;
    let archive = Archive::open(&fixture.path)?;
    let project_file = archive.project_files()[0].clone();
    let manufacturer_file = archive.manufacturer_files()[0].clone();
    let project = project_file.decode()?;

    archive.close()?;
    archive.close()?;
    drop(archive);

    assert_eq!(project.installations[0].name, "Main");
    assert!(matches!(project_file.decode(), Err(Error::ClosedArchive)));
    assert!(matches!(project_file.decode_info(), Err(Error::ClosedArchive)));
    assert!(matches!(manufacturer_file.decode(), Err(Error::ClosedArchive)));
    Ok(())
}

#[test]
fn archive_without_known_files_is_empty() -> anyhow::Result<()> {
    let fixture = write_archive(&[
        ("knx_master.xml", "<KNX/>"),
        ("M-00FA/Hardware.xml", "<KNX/>"),
        ("readme.txt", "hello"),
    ])?;
    let archive = Archive::open(&fixture.path)?;
    assert!(archive.project_files().is_empty());
    assert!(archive.manufacturer_files().is_empty());
    Ok(())
}

#[test]
fn encrypted_entry_without_password_is_reported() -> anyhow::Result<()> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file("P-01AB/Project.xml", FileOptions::default())?;
    writer.write_all(project_header(NS13).as_bytes())?;
    let mut data = writer.finish()?.into_inner();

    // set the "encrypted" bit of the central directory record
    let record = data
        .windows(4)
        .position(|window| window == [0x50, 0x4b, 0x01, 0x02])
        .ok_or_else(|| anyhow::anyhow!("central directory not found"))?;
    data[record + 8] |= 0x01;

    let archive = Archive::from_bytes(data)?;
    assert_eq!(archive.project_files().len(), 1);
    match archive.project_files()[0].decode_info() {
        Err(Error::PasswordRequired { entry }) => assert_eq!(entry, "P-01AB/Project.xml"),
        other => panic!("unexpected result: {:?}", other),
    }
    Ok(())
}

#[test]
fn unknown_manufacturer_content_does_not_change_the_model() -> anyhow::Result<()> {
    let noisy = MANUFACTURER_XML
        .replace(
            "<ComObject Id=",
            r#"<ComObject InternalDescription="x" VisibleDescription="y" Id="#,
        )
        .replace(
            r#"ReadOnInitFlag="Enabled"/>"#,
            r#"ReadOnInitFlag="Enabled" SecurityRequired="None"><Extension Kind="future"/></ComObject>"#,
        )
        .replace(
            "<ComObjectRef Id=",
            r#"<ComObjectRef Tag="1" Id="#,
        )
        .replace(
            "<Static>",
            r#"<Static Layout="v2"><Parameters><Parameter Id="P-1" Value="3"/></Parameters>"#,
        )
        .replace(
            "</ComObjectRefs>",
            "</ComObjectRefs><ModuleDefs/>",
        )
        .replace(
            "<ApplicationPrograms>",
            r#"<Catalog/><ApplicationPrograms>"#,
        );
    let fixture = write_archive(&[
        ("M-00FA/M-00FA_A-0001-10-0000.xml", MANUFACTURER_XML),
        ("M-00FA/M-00FA_A-0002-10-0000.xml", noisy.as_str()),
    ])?;
    let archive = Archive::open(&fixture.path)?;
    let clean = archive.manufacturer_files()[0].decode()?;
    let noisy = archive.manufacturer_files()[1].decode()?;
    assert_eq!(clean.programs[0].objects.len(), 1);
    assert_eq!(clean.programs[0].object_refs.len(), 1);
    assert_eq!(clean, noisy);
    Ok(())
}
